use crate::calendar::MonthGrid;
use crate::models::Domain;
use serde_json::Value;
use std::fmt::Write as _;

pub fn render_index(domain: Domain, grid: &MonthGrid, record: &Value) -> String {
    let record_json = serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string());

    INDEX_HTML
        .replace("{{DOMAIN}}", domain.as_str())
        .replace("{{DOMAIN_LABEL}}", domain.label())
        .replace("{{NAV}}", &render_nav(domain, grid))
        .replace("{{MONTH_TITLE}}", &grid.title)
        .replace("{{PREV_HREF}}", &page_href(domain, &grid.previous_month, None))
        .replace("{{NEXT_HREF}}", &page_href(domain, &grid.next_month, None))
        .replace("{{GRID}}", &render_grid(domain, grid))
        .replace("{{DATE}}", &grid.selected.to_string())
        .replace("{{RECORD}}", &escape_html(&record_json))
}

fn page_href(domain: Domain, month: &str, date: Option<&str>) -> String {
    match date {
        Some(date) => format!("/?domain={domain}&month={month}&date={date}"),
        None => format!("/?domain={domain}&month={month}"),
    }
}

fn render_nav(active: Domain, grid: &MonthGrid) -> String {
    let mut out = String::new();
    for domain in Domain::ALL {
        let class = if domain == active { "tab active" } else { "tab" };
        let _ = write!(
            out,
            r#"<a class="{class}" href="{href}">{label}</a>"#,
            href = page_href(domain, &grid.month, Some(grid.selected.to_string().as_str())),
            label = domain.label(),
        );
    }
    out
}

fn render_grid(domain: Domain, grid: &MonthGrid) -> String {
    let mut out = String::new();
    for label in grid.weekdays {
        let _ = write!(out, r#"<div class="weekday">{label}</div>"#);
    }
    for _ in 0..grid.leading_blanks {
        out.push_str(r#"<div class="blank"></div>"#);
    }
    for cell in &grid.days {
        let mut class = String::from("day");
        if cell.is_selected {
            class.push_str(" selected");
        } else if cell.is_today {
            class.push_str(" today");
        }
        if cell.has_data {
            class.push_str(" marked");
        }
        let _ = write!(
            out,
            r#"<a class="{class}" href="{href}">{day}</a>"#,
            href = page_href(domain, &grid.month, Some(cell.date.to_string().as_str())),
            day = cell.day,
        );
    }
    out
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Daily Glow · {{DOMAIN_LABEL}}</title>
  <style>
    :root {
      --bg-1: #fdf2f6;
      --bg-2: #f4d6e4;
      --ink: #2b2a28;
      --accent: #d9467a;
      --accent-2: #2f4858;
      --marked: #3fb67c;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #fbe7ef 60%, #f9f2f5 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .tab {
      border-radius: 999px;
      padding: 8px 14px;
      font-weight: 600;
      color: #6b645d;
      text-decoration: none;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
    }

    .layout {
      display: grid;
      grid-template-columns: minmax(260px, 1fr) 2fr;
      gap: 24px;
    }

    .card {
      background: white;
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .month-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      margin-bottom: 12px;
    }

    .month-header a {
      text-decoration: none;
      color: var(--accent-2);
      font-weight: 600;
      padding: 4px 10px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 4px;
      text-align: center;
    }

    .weekday {
      font-size: 0.75rem;
      color: #8b857d;
      padding: 6px 0;
    }

    .day {
      display: block;
      padding: 6px 0;
      border-radius: 8px;
      color: var(--ink);
      text-decoration: none;
    }

    .day.today {
      background: #fbe0ea;
    }

    .day.selected {
      background: var(--accent);
      color: white;
    }

    .day.marked {
      box-shadow: inset 0 0 0 2px var(--marked);
    }

    textarea {
      width: 100%;
      min-height: 320px;
      font-family: monospace;
      font-size: 0.9rem;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 12px;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    .actions {
      display: flex;
      gap: 12px;
      align-items: center;
      margin-top: 12px;
    }

    .actions a {
      color: var(--accent-2);
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    @media (max-width: 720px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Daily Glow</h1>
      <nav class="tabs">{{NAV}}</nav>
    </header>
    <section class="layout">
      <div class="card">
        <div class="month-header">
          <a href="{{PREV_HREF}}" aria-label="Previous month">&larr;</a>
          <strong>{{MONTH_TITLE}}</strong>
          <a href="{{NEXT_HREF}}" aria-label="Next month">&rarr;</a>
        </div>
        <div class="grid">{{GRID}}</div>
      </div>
      <div class="card">
        <h2>{{DOMAIN_LABEL}} · <span id="date">{{DATE}}</span></h2>
        <textarea id="record" spellcheck="false">{{RECORD}}</textarea>
        <div class="actions">
          <button id="save" type="button">Save day</button>
          <a href="/api/export?format=json">Export JSON</a>
          <a href="/api/export?format=text">Export report</a>
          <span class="status" id="status"></span>
        </div>
      </div>
    </section>
  </main>
  <script>
    const statusEl = document.getElementById('status');
    const recordEl = document.getElementById('record');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    document.getElementById('save').addEventListener('click', async () => {
      let patch;
      try {
        patch = JSON.parse(recordEl.value);
      } catch (err) {
        setStatus('Record is not valid JSON', 'error');
        return;
      }
      const response = await fetch('/api/{{DOMAIN}}/days/{{DATE}}', {
        method: 'PATCH',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(patch),
      });
      if (!response.ok) {
        setStatus(await response.text(), 'error');
        return;
      }
      const data = await response.json();
      recordEl.value = JSON.stringify(data.record, null, 2);
      setStatus('Saved', 'ok');
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{month_grid, CalendarState};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    #[test]
    fn index_renders_grid_and_escaped_record() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let grid = month_grid(&CalendarState::new(today), today, &BTreeSet::new());
        let record = serde_json::json!({ "notes": "<b>oily</b>" });

        let html = render_index(Domain::Haircare, &grid, &record);
        assert!(html.contains("March 2024"));
        assert!(html.contains("/api/haircare/days/2024-03-15"));
        assert!(html.contains("&lt;b&gt;oily&lt;/b&gt;"));
        assert!(!html.contains("{{"));
        assert_eq!(html.matches(r#"<div class="blank"></div>"#).count(), 5);
        assert_eq!(html.matches(r#"class="day"#).count(), 31);
    }
}
