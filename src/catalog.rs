use crate::models::{Category, FactorInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    Check,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Factor {
    pub id: &'static str,
    pub label: &'static str,
    pub category: Category,
    pub points: i64,
    pub kind: FactorKind,
    pub unit: Option<&'static str>,
}

impl Factor {
    const fn check(id: &'static str, label: &'static str, category: Category, points: i64) -> Self {
        Self {
            id,
            label,
            category,
            points,
            kind: FactorKind::Check,
            unit: None,
        }
    }

    const fn count(
        id: &'static str,
        label: &'static str,
        category: Category,
        points: i64,
        unit: &'static str,
    ) -> Self {
        Self {
            id,
            label,
            category,
            points,
            kind: FactorKind::Count,
            unit: Some(unit),
        }
    }

    pub fn info(&self) -> FactorInfo {
        FactorInfo {
            id: self.id.to_string(),
            label: self.label.to_string(),
            category: self.category,
            kind: self.kind,
            points: self.points,
            unit: self.unit.map(str::to_string),
        }
    }
}

const POSITIVE: Category = Category::Positive;
const NEGATIVE: Category = Category::Negative;

static POSITIVE_FACTORS: [Factor; 9] = [
    Factor::check("mobility20", "20' mobility", POSITIVE, 1),
    Factor::count("cooldown10", "10' cooldown", POSITIVE, 1, "sets"),
    Factor::count("sleep9plus", "Hours sleep over 8", POSITIVE, 1, "hrs"),
    Factor::check("shake30", "Protein shake within 30'", POSITIVE, 1),
    Factor::check("meal90", "Meal within 90'", POSITIVE, 1),
    Factor::count("nap30", "30' nap", POSITIVE, 1, "sets"),
    Factor::check("callParents", "Called parents", POSITIVE, 1),
    Factor::count("sleepBefore12", "Sleep hours before 12am", POSITIVE, 1, "hrs"),
    Factor::check("supplements", "All supplements", POSITIVE, 1),
];

static NEGATIVE_FACTORS: [Factor; 7] = [
    Factor::count("practiceHours", "Hours of practice", NEGATIVE, -1, "hrs"),
    Factor::count("sleepUnder8", "Hours under 8hrs sleep", NEGATIVE, -1, "hrs"),
    Factor::count("saturdayDrinks", "Saturday drinks (over 2)", NEGATIVE, -1, "drinks"),
    Factor::count("weeknightDrinks", "Weeknight drinks", NEGATIVE, -1, "drinks"),
    Factor::count("lateBedtime", "Hours past bedtime", NEGATIVE, -1, "hrs"),
    Factor::count("fluidDeficit", "Lbs fluid not replaced", NEGATIVE, -1, "lbs"),
    Factor::count("calorieDeficit", "500 cal deficits", NEGATIVE, -1, "units"),
];

/// Factors of one category in display order.
pub fn list_factors(category: Category) -> &'static [Factor] {
    match category {
        Category::Positive => &POSITIVE_FACTORS,
        Category::Negative => &NEGATIVE_FACTORS,
    }
}

pub fn find_factor(category: Category, id: &str) -> Option<&'static Factor> {
    list_factors(category).iter().find(|factor| factor.id == id)
}

pub fn all_factors() -> impl Iterator<Item = &'static Factor> {
    Category::ALL
        .into_iter()
        .flat_map(|category| list_factors(category).iter())
}
