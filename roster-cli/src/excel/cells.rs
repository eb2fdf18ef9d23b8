//! Conversions from calamine cells to roster values

use calamine::Data;
use serde_json::{Value, json};

/// Whether a cell counts as missing
///
/// Empty cells, error cells and whitespace-only strings are all missing.
pub fn is_missing(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Trimmed text content of a cell
///
/// Whole floats render without a fractional part so numeric names or
/// links do not pick up a trailing `.0`.
pub fn cell_text(cell: &Data) -> Option<String> {
    if is_missing(cell) {
        return None;
    }
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => return None,
    };
    Some(text)
}

/// Integer value of a cell, truncating floats
///
/// Text cells are accepted when they hold a number. Returns `Err` with the
/// offending text when the cell is present but not numeric.
pub fn cell_integer(cell: &Data) -> Result<Option<i64>, String> {
    if is_missing(cell) {
        return Ok(None);
    }
    match cell {
        Data::Int(i) => Ok(Some(*i)),
        Data::Float(f) => Ok(Some(f.trunc() as i64)),
        Data::Bool(b) => Ok(Some(i64::from(*b))),
        Data::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Some(i));
            }
            s.parse::<f64>()
                .map(|f| Some(f.trunc() as i64))
                .map_err(|_| s.to_string())
        }
        other => Err(cell_text(other).unwrap_or_default()),
    }
}

/// Convert a cell to JSON for raw extraction
pub fn cell_to_value(cell: &Data) -> Value {
    if is_missing(cell) {
        return Value::Null;
    }
    match cell {
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => json!(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                json!(*f as i64)
            } else {
                json!(*f)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => json!(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Empty | Data::Error(_) => Value::Null,
    }
}

/// Name of the cell's variant, as shown in sheet previews
pub fn cell_type(cell: &Data) -> &'static str {
    match cell {
        Data::Int(_) => "Int",
        Data::Float(_) => "Float",
        Data::String(_) => "String",
        Data::Bool(_) => "Bool",
        Data::DateTime(_) => "DateTime",
        Data::DateTimeIso(_) => "DateTimeIso",
        Data::DurationIso(_) => "DurationIso",
        Data::Error(_) => "Error",
        Data::Empty => "Empty",
    }
}

/// Header cell as a trimmed column name
pub fn header_name(cell: &Data) -> String {
    cell_text(cell).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_missing_cells() {
        assert!(is_missing(&Data::Empty));
        assert!(is_missing(&Data::String("   ".to_string())));
        assert!(is_missing(&Data::Error(CellErrorType::NA)));
        assert!(!is_missing(&Data::Int(0)));
        assert!(!is_missing(&Data::String("x".to_string())));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::String("  O+ ".to_string())), Some("O+".to_string()));
        assert_eq!(cell_text(&Data::Float(9876543210.0)), Some("9876543210".to_string()));
        assert_eq!(cell_text(&Data::Float(1.5)), Some("1.5".to_string()));
        assert_eq!(cell_text(&Data::Empty), None);
    }

    #[test]
    fn test_cell_integer() {
        assert_eq!(cell_integer(&Data::Float(42.0)), Ok(Some(42)));
        assert_eq!(cell_integer(&Data::Float(42.9)), Ok(Some(42)));
        assert_eq!(cell_integer(&Data::Int(7)), Ok(Some(7)));
        assert_eq!(cell_integer(&Data::String(" 12 ".to_string())), Ok(Some(12)));
        assert_eq!(cell_integer(&Data::Empty), Ok(None));
        assert_eq!(
            cell_integer(&Data::String("abc".to_string())),
            Err("abc".to_string())
        );
    }

    #[test]
    fn test_cell_to_value() {
        assert_eq!(cell_to_value(&Data::Float(3.0)), json!(3));
        assert_eq!(cell_to_value(&Data::Float(3.5)), json!(3.5));
        assert_eq!(cell_to_value(&Data::Empty), Value::Null);
        assert_eq!(cell_to_value(&Data::String("A".to_string())), json!("A"));
    }

    #[test]
    fn test_cell_type() {
        assert_eq!(cell_type(&Data::Float(1.0)), "Float");
        assert_eq!(cell_type(&Data::String(String::new())), "String");
        assert_eq!(cell_type(&Data::Error(CellErrorType::Div0)), "Error");
        assert_eq!(cell_type(&Data::Empty), "Empty");
    }
}
