use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single loosely-typed table cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, used for `noiseParameters` and condition table
/// parameter columns where a value may be numeric or symbolic.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`; symbolic values yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Guess the type of a raw TSV cell.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of a measurement or simulation table
// ---------------------------------------------------------------------------

/// Which of the two data tables a [`DataTable`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Measurement,
    Simulation,
}

impl TableKind {
    /// Name of the value column in the TSV layout.
    pub fn value_column(self) -> &'static str {
        match self {
            TableKind::Measurement => "measurement",
            TableKind::Simulation => "simulation",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_column())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub observable_id: String,
    pub simulation_condition_id: String,
    pub preequilibration_condition_id: Option<String>,
    pub time: f64,
    /// The `measurement` or `simulation` column, depending on the table.
    pub value: f64,
    pub noise_parameters: Option<CellValue>,
    pub dataset_id: Option<String>,
}

impl Record {
    /// The dataset this row belongs to: the explicit `datasetId`, or one
    /// derived from the observable and condition ids when it is absent.
    pub fn dataset_key(&self) -> Cow<'_, str> {
        match (&self.dataset_id, &self.preequilibration_condition_id) {
            (Some(id), _) => Cow::Borrowed(id.as_str()),
            (None, Some(preeq)) => Cow::Owned(format!(
                "{}_{}_{}",
                self.observable_id, preeq, self.simulation_condition_id
            )),
            (None, None) => Cow::Owned(format!(
                "{}_{}",
                self.observable_id, self.simulation_condition_id
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// DataTable – a complete measurement or simulation table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DataTable {
    pub kind: TableKind,
    pub rows: Vec<Record>,
}

impl DataTable {
    pub fn new(kind: TableKind, rows: Vec<Record>) -> Self {
        Self { kind, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct observable ids in order of first appearance.
    pub fn observable_ids(&self) -> Vec<String> {
        super::filter::unique_in_order(self.rows.iter().map(|r| r.observable_id.clone()))
    }

    /// Distinct simulation condition ids in order of first appearance.
    pub fn condition_ids(&self) -> Vec<String> {
        super::filter::unique_in_order(
            self.rows.iter().map(|r| r.simulation_condition_id.clone()),
        )
    }
}

// ---------------------------------------------------------------------------
// ConditionTable – condition id → parameter values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ConditionTable {
    /// Parameter column names, in file order (excludes `conditionId`).
    pub column_names: Vec<String>,
    pub conditions: BTreeMap<String, BTreeMap<String, CellValue>>,
}

impl ConditionTable {
    /// Numeric value of `column` for `condition_id`, if both exist and the
    /// cell is numeric.
    pub fn numeric_value(&self, condition_id: &str, column: &str) -> Option<f64> {
        self.conditions
            .get(condition_id)?
            .get(column)
            .and_then(CellValue::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(obs: &str, cond: &str) -> Record {
        Record {
            observable_id: obs.to_string(),
            simulation_condition_id: cond.to_string(),
            preequilibration_condition_id: None,
            time: 0.0,
            value: 1.0,
            noise_parameters: None,
            dataset_id: None,
        }
    }

    #[test]
    fn cell_value_guesses_types() {
        assert_eq!(CellValue::parse("3"), CellValue::Integer(3));
        assert_eq!(CellValue::parse("0.5"), CellValue::Float(0.5));
        assert_eq!(CellValue::parse("sd_obs1"), CellValue::String("sd_obs1".into()));
        assert_eq!(CellValue::parse("  "), CellValue::Null);
        assert_eq!(CellValue::Integer(2).as_f64(), Some(2.0));
        assert_eq!(CellValue::String("x".into()).as_f64(), None);
    }

    #[test]
    fn dataset_key_prefers_explicit_id() {
        let mut r = row("obs_a", "c1");
        assert_eq!(r.dataset_key(), "obs_a_c1");

        r.preequilibration_condition_id = Some("pre".into());
        assert_eq!(r.dataset_key(), "obs_a_pre_c1");

        r.dataset_id = Some("ds1".into());
        assert_eq!(r.dataset_key(), "ds1");
    }

    #[test]
    fn distinct_ids_keep_table_order() {
        let table = DataTable::new(
            TableKind::Measurement,
            vec![row("b", "c10"), row("a", "c2"), row("b", "c1"), row("a", "c10")],
        );
        assert_eq!(table.observable_ids(), vec!["b", "a"]);
        assert_eq!(table.condition_ids(), vec!["c10", "c2", "c1"]);
    }
}
