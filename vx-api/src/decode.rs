//! Reply post-processing declared by [`Expectation`]s

use lwcp_parser::{Properties, Value};

use crate::model::{Expectation, OperationSpec};

/// Apply every expectation of `spec` to a reply's properties
pub fn apply_expectations(spec: &OperationSpec, props: &mut Properties) {
    for expectation in spec.expects {
        apply(expectation, props);
    }
}

fn apply(expectation: &Expectation, props: &mut Properties) {
    if !expectation.each.is_empty() {
        if let Some(Value::List(rows)) | Some(Value::Tuple(rows)) = props.get(expectation.property) {
            let records = rows.iter().map(|row| name_row(expectation.each, row)).collect();
            props.insert(expectation.property, Value::List(records));
        }
    }
    if !expectation.rename.is_empty() {
        props.rename(expectation.property, expectation.rename);
    }
}

/// Pair the fields of one row with their names; rows that are not sequences are kept as-is
fn name_row(names: &[&str], row: &Value) -> Value {
    match row.as_slice() {
        Some(fields) => Value::Record(
            names
                .iter()
                .zip(fields.iter())
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        ),
        None => row.clone(),
    }
}
