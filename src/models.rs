use crate::calendar::DateKey;
use crate::errors::{StoreError, StoreResult};
use crate::store::DayRecord;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Skincare,
    Haircare,
    Supplements,
    Study,
    Bodycare,
    Exercise,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Skincare,
        Domain::Haircare,
        Domain::Supplements,
        Domain::Study,
        Domain::Bodycare,
        Domain::Exercise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skincare => "skincare",
            Self::Haircare => "haircare",
            Self::Supplements => "supplements",
            Self::Study => "study",
            Self::Bodycare => "bodycare",
            Self::Exercise => "exercise",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Skincare => "Skincare",
            Self::Haircare => "Haircare",
            Self::Supplements => "Supplements",
            Self::Study => "Study",
            Self::Bodycare => "Bodycare",
            Self::Exercise => "Exercise",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| format!("unknown domain '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concern {
    pub id: u64,
    pub text: String,
    pub severity: u8,
    pub date: DateKey,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkincareDay {
    pub morning_routine: bool,
    pub evening_routine: bool,
    pub concerns: Vec<Concern>,
    pub notes: String,
    pub products: Vec<String>,
}

pub const MAX_CONCERN_SEVERITY: u8 = 5;
pub const MAX_HAIR_FALL: u8 = 3;
pub const MAX_DAILY_HOURS: f64 = 24.0;

fn check_hours(field: &str, hours: f64) -> StoreResult<()> {
    if !(0.0..=MAX_DAILY_HOURS).contains(&hours) {
        return Err(StoreError::InvalidPatch(format!(
            "{field} must be between 0 and {MAX_DAILY_HOURS}, got {hours}"
        )));
    }
    Ok(())
}

impl DayRecord for SkincareDay {
    fn has_activity(&self) -> bool {
        self.morning_routine || self.evening_routine
    }

    fn validate(&self) -> StoreResult<()> {
        match self
            .concerns
            .iter()
            .find(|concern| !(1..=MAX_CONCERN_SEVERITY).contains(&concern.severity))
        {
            Some(concern) => Err(StoreError::InvalidPatch(format!(
                "concern severity must be 1 to {MAX_CONCERN_SEVERITY}, got {}",
                concern.severity
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: u64,
    pub name: String,
    pub date: DateKey,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HaircareDay {
    pub wash_day: bool,
    pub oiling: bool,
    pub dandruff: bool,
    /// 0 none, 1 minimal, 2 moderate, 3 high.
    pub hair_fall: u8,
    pub treatments: Vec<Treatment>,
    pub notes: String,
}

impl DayRecord for HaircareDay {
    fn has_activity(&self) -> bool {
        self.wash_day || self.oiling
    }

    fn validate(&self) -> StoreResult<()> {
        if self.hair_fall > MAX_HAIR_FALL {
            return Err(StoreError::InvalidPatch(format!(
                "hairFall must be 0 to {MAX_HAIR_FALL}, got {}",
                self.hair_fall
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplementsDay {
    /// Keyed by supplement id.
    pub supplements_taken: BTreeMap<String, bool>,
    pub foods: Vec<FoodItem>,
    pub water_intake: u32,
    pub notes: String,
}

impl DayRecord for SupplementsDay {
    fn has_activity(&self) -> bool {
        self.supplements_taken.values().any(|taken| *taken)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLink {
    pub id: u64,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyDay {
    pub studied_subjects: BTreeMap<String, bool>,
    pub hours_studied: BTreeMap<String, f64>,
    pub notes: String,
    pub links: Vec<StudyLink>,
}

impl StudyDay {
    pub fn total_hours(&self) -> f64 {
        self.hours_studied.values().sum()
    }
}

impl DayRecord for StudyDay {
    fn has_activity(&self) -> bool {
        self.studied_subjects.values().any(|studied| *studied)
    }

    fn validate(&self) -> StoreResult<()> {
        for hours in self.hours_studied.values() {
            check_hours("hoursStudied", *hours)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: u64,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodycareDay {
    pub completed_items: BTreeMap<String, bool>,
    pub water_intake: u32,
    pub sleep_hours: f64,
    pub weight: f64,
    pub mood: String,
    pub symptoms: Vec<Symptom>,
    pub notes: String,
    pub workout_minutes: u32,
    pub steps: u32,
}

impl BodycareDay {
    pub fn completed_count(&self) -> usize {
        self.completed_items.values().filter(|done| **done).count()
    }
}

impl DayRecord for BodycareDay {
    fn has_activity(&self) -> bool {
        self.completed_count() > 0
    }

    fn validate(&self) -> StoreResult<()> {
        check_hours("sleepHours", self.sleep_hours)?;
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(StoreError::InvalidPatch(format!(
                "weight must not be negative, got {}",
                self.weight
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: u64,
    pub name: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseDay {
    pub workouts: Vec<Workout>,
    pub active_minutes: u32,
    pub notes: String,
}

impl DayRecord for ExerciseDay {
    fn has_activity(&self) -> bool {
        !self.workouts.is_empty() || self.active_minutes > 0
    }
}

#[derive(Debug, Serialize)]
pub struct DayResponse<R> {
    pub domain: Domain,
    pub date: DateKey,
    pub record: R,
}

#[derive(Debug, Serialize)]
pub struct DomainSummary {
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub domain: Option<String>,
    pub month: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_names_round_trip() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert!("nails".parse::<Domain>().is_err());
        assert_eq!(serde_json::to_string(&Domain::Bodycare).unwrap(), "\"bodycare\"");
    }

    #[test]
    fn default_records_use_camel_case_fields() {
        let value = serde_json::to_value(HaircareDay::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "washDay": false,
                "oiling": false,
                "dandruff": false,
                "hairFall": 0,
                "treatments": [],
                "notes": ""
            })
        );
    }

    #[test]
    fn activity_follows_domain_markers() {
        assert!(!SkincareDay::default().has_activity());
        assert!(SkincareDay { evening_routine: true, ..Default::default() }.has_activity());

        let mut supplements = SupplementsDay::default();
        supplements.supplements_taken.insert("17".into(), false);
        assert!(!supplements.has_activity());
        supplements.supplements_taken.insert("18".into(), true);
        assert!(supplements.has_activity());

        assert!(ExerciseDay { active_minutes: 20, ..Default::default() }.has_activity());
    }

    #[test]
    fn validation_bounds_follow_domain_ranges() {
        assert!(HaircareDay { hair_fall: 3, ..Default::default() }.validate().is_ok());
        assert!(HaircareDay { hair_fall: 4, ..Default::default() }.validate().is_err());

        let concern = |severity| Concern {
            id: 1,
            text: "redness".into(),
            severity,
            date: "2024-03-15".parse().unwrap(),
        };
        assert!(SkincareDay { concerns: vec![concern(5)], ..Default::default() }.validate().is_ok());
        assert!(SkincareDay { concerns: vec![concern(0)], ..Default::default() }.validate().is_err());

        assert!(BodycareDay { sleep_hours: 7.5, weight: 61.2, ..Default::default() }.validate().is_ok());
        assert!(BodycareDay { sleep_hours: 25.0, ..Default::default() }.validate().is_err());
        assert!(BodycareDay { weight: -1.0, ..Default::default() }.validate().is_err());
    }

    #[test]
    fn missing_fields_deserialize_as_defaults() {
        let day: StudyDay = serde_json::from_str(r#"{"notes": "graphs"}"#).unwrap();
        assert_eq!(day.notes, "graphs");
        assert!(day.hours_studied.is_empty());
        assert!(day.links.is_empty());
    }

    #[test]
    fn study_sums_hours() {
        let mut day = StudyDay::default();
        day.hours_studied.insert("1".into(), 1.5);
        day.hours_studied.insert("2".into(), 2.0);
        assert_eq!(day.total_hours(), 3.5);
    }
}
