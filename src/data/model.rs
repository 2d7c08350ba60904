use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CategoryValue – an opaque covariate key
// ---------------------------------------------------------------------------

/// A dynamically-typed category key. Covariate columns are encoded
/// differently across exports (`0/1`, `true/false`, `"Yes"/"No"`), so the
/// store keeps whatever the source had and only relies on equality and order.
///
/// Variant order is the sort order: `Null < Bool < Integer < String`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum CategoryValue {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryValue::Null => write!(f, "<null>"),
            CategoryValue::Bool(b) => write!(f, "{b}"),
            CategoryValue::Integer(i) => write!(f, "{i}"),
            CategoryValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl CategoryValue {
    /// Integer view, used for numeric range queries.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CategoryValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed-level categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Gender::Female => "F",
            Gender::Male => "M",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "F" => Some(Gender::Female),
            "M" => Some(Gender::Male),
            _ => None,
        }
    }
}

/// The appointment outcome. `Yes` means the patient did not show up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Outcome {
    No,
    Yes,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::No, Outcome::Yes];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::No => "No",
            Outcome::Yes => "Yes",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "No" => Some(Outcome::No),
            "Yes" => Some(Outcome::Yes),
            _ => None,
        }
    }
}

/// Binary / categorical covariates charted against the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Covariate {
    Scholarship,
    SmsReceived,
    Handcap,
    Hipertension,
    Diabetes,
    Alcoholism,
}

impl Covariate {
    pub const ALL: [Covariate; 6] = [
        Covariate::Scholarship,
        Covariate::SmsReceived,
        Covariate::Handcap,
        Covariate::Hipertension,
        Covariate::Diabetes,
        Covariate::Alcoholism,
    ];

    /// Source column name.
    pub fn column_name(self) -> &'static str {
        match self {
            Covariate::Scholarship => "scholarship",
            Covariate::SmsReceived => "sms_received",
            Covariate::Handcap => "handcap",
            Covariate::Hipertension => "hipertension",
            Covariate::Diabetes => "diabetes",
            Covariate::Alcoholism => "alcoholism",
        }
    }

    /// Chart title.
    pub fn title(self) -> &'static str {
        match self {
            Covariate::Scholarship => "By Scholarship",
            Covariate::SmsReceived => "By SMS Received",
            Covariate::Handcap => "By Disability",
            Covariate::Hipertension => "By Hypertension",
            Covariate::Diabetes => "By Diabetes",
            Covariate::Alcoholism => "By Alcoholism",
        }
    }
}

// ---------------------------------------------------------------------------
// Column – name-addressable view over the fixed schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Neighbourhood,
    Age,
    Gender,
    NoShow,
    Covariate(Covariate),
    DaysUntilAppointment,
}

impl Column {
    /// Every column the loader requires, in source order.
    pub const REQUIRED: [Column; 11] = [
        Column::Neighbourhood,
        Column::Age,
        Column::Gender,
        Column::NoShow,
        Column::Covariate(Covariate::Scholarship),
        Column::Covariate(Covariate::SmsReceived),
        Column::Covariate(Covariate::Handcap),
        Column::Covariate(Covariate::Hipertension),
        Column::Covariate(Covariate::Diabetes),
        Column::Covariate(Covariate::Alcoholism),
        Column::DaysUntilAppointment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Neighbourhood => "neighbourhood",
            Column::Age => "age",
            Column::Gender => "gender",
            Column::NoShow => "no_show",
            Column::Covariate(c) => c.column_name(),
            Column::DaysUntilAppointment => "days_until_appointment",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::REQUIRED.iter().copied().find(|c| c.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Appointment – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub neighbourhood: String,
    pub age: i64,
    pub gender: Gender,
    pub no_show: Outcome,
    pub scholarship: CategoryValue,
    pub sms_received: CategoryValue,
    pub handcap: CategoryValue,
    pub hipertension: CategoryValue,
    pub diabetes: CategoryValue,
    pub alcoholism: CategoryValue,
    pub days_until_appointment: i64,
}

impl Appointment {
    pub fn covariate(&self, covariate: Covariate) -> &CategoryValue {
        match covariate {
            Covariate::Scholarship => &self.scholarship,
            Covariate::SmsReceived => &self.sms_received,
            Covariate::Handcap => &self.handcap,
            Covariate::Hipertension => &self.hipertension,
            Covariate::Diabetes => &self.diabetes,
            Covariate::Alcoholism => &self.alcoholism,
        }
    }

    /// Read one cell as a category key.
    pub fn value(&self, column: Column) -> CategoryValue {
        match column {
            Column::Neighbourhood => CategoryValue::String(self.neighbourhood.clone()),
            Column::Age => CategoryValue::Integer(self.age),
            Column::Gender => CategoryValue::String(self.gender.code().to_string()),
            Column::NoShow => CategoryValue::String(self.no_show.label().to_string()),
            Column::Covariate(c) => self.covariate(c).clone(),
            Column::DaysUntilAppointment => CategoryValue::Integer(self.days_until_appointment),
        }
    }
}

// ---------------------------------------------------------------------------
// AppointmentDataset – the immutable Dataset Store
// ---------------------------------------------------------------------------

/// The loaded table with pre-computed indices. Nothing mutates it after
/// construction, so one instance can back any number of recomputations.
#[derive(Debug, Clone)]
pub struct AppointmentDataset {
    records: Vec<Appointment>,
    /// Sorted distinct neighbourhoods (the dropdown options).
    neighbourhoods: Vec<String>,
    age_bounds: Option<(i64, i64)>,
    days_bounds: Option<(i64, i64)>,
}

impl AppointmentDataset {
    /// Build the store and its column indices from loaded rows.
    pub fn from_records(records: Vec<Appointment>) -> Self {
        let neighbourhoods: BTreeSet<&str> =
            records.iter().map(|r| r.neighbourhood.as_str()).collect();
        let neighbourhoods = neighbourhoods.into_iter().map(str::to_string).collect();

        let age_bounds = min_max(records.iter().map(|r| r.age));
        let days_bounds = min_max(records.iter().map(|r| r.days_until_appointment));

        AppointmentDataset {
            records,
            neighbourhoods,
            age_bounds,
            days_bounds,
        }
    }

    pub fn records(&self) -> &[Appointment] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a column by its source name.
    pub fn column(&self, name: &str) -> Option<Column> {
        Column::from_name(name)
    }

    /// Read a single cell; `None` when `row` is out of bounds.
    pub fn value(&self, row: usize, column: Column) -> Option<CategoryValue> {
        self.records.get(row).map(|r| r.value(column))
    }

    /// Sorted distinct values of a column.
    pub fn distinct(&self, column: Column) -> BTreeSet<CategoryValue> {
        self.records.iter().map(|r| r.value(column)).collect()
    }

    /// `(min, max)` of a numeric column; `None` for categorical columns or an
    /// empty table.
    pub fn numeric_range(&self, column: Column) -> Option<(i64, i64)> {
        match column {
            Column::Age => self.age_bounds,
            Column::DaysUntilAppointment => self.days_bounds,
            _ => None,
        }
    }

    pub fn neighbourhoods(&self) -> &[String] {
        &self.neighbourhoods
    }

    pub fn age_bounds(&self) -> Option<(i64, i64)> {
        self.age_bounds
    }

    /// Slider marks: min, integer midpoint, max.
    pub fn age_marks(&self) -> Option<[i64; 3]> {
        self.age_bounds
            .map(|(lo, hi)| [lo, (lo + hi).div_euclid(2), hi])
    }

    /// Maximum `days_until_appointment` over the whole table. Bin edges are
    /// anchored to this value, never to a filtered subset.
    pub fn max_days_until(&self) -> Option<i64> {
        self.days_bounds.map(|(_, hi)| hi)
    }
}

fn min_max(values: impl Iterator<Item = i64>) -> Option<(i64, i64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
pub(crate) fn appointment(neighbourhood: &str, age: i64, no_show: Outcome) -> Appointment {
    Appointment {
        neighbourhood: neighbourhood.to_string(),
        age,
        gender: Gender::Female,
        no_show,
        scholarship: CategoryValue::Integer(0),
        sms_received: CategoryValue::Integer(0),
        handcap: CategoryValue::Integer(0),
        hipertension: CategoryValue::Integer(0),
        diabetes: CategoryValue::Integer(0),
        alcoholism: CategoryValue::Integer(0),
        days_until_appointment: 0,
    }
}
