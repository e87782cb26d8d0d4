//! WHERE / HAVING condition groups

use super::common::{Column, Condition, Logic};
use crate::quote::{escape_string, quote_column, quote_value};
use crate::{Error, Operator, Result, Value};

/// One entry of a condition group, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionEntry {
    /// Opening bracket joined to what precedes it
    Open(Logic),
    /// Closing bracket
    Close,
    Clause(Logic, Condition),
}

/// Flat list of bracket markers and clauses
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionGroup {
    entries: Vec<ConditionEntry>,
    depth: usize,
}

impl ConditionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, logic: Logic, condition: Condition) {
        self.entries.push(ConditionEntry::Clause(logic, condition));
    }

    pub fn open(&mut self, logic: Logic) {
        self.entries.push(ConditionEntry::Open(logic));
        self.depth += 1;
    }

    /// Close the innermost open bracket
    ///
    /// `label` names the clause in error messages.
    pub fn close(&mut self, close_if_empty: bool, label: &str) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::malformed_group(format!(
                "end() called with no open group in {label}"
            )));
        }
        if close_if_empty && matches!(self.entries.last(), Some(ConditionEntry::Open(_))) {
            self.entries.pop();
        } else {
            self.entries.push(ConditionEntry::Close);
        }
        self.depth -= 1;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the group body, without the leading keyword
    pub fn to_sql(&self, label: &str) -> Result<String> {
        if self.depth != 0 {
            return Err(Error::malformed_group(format!(
                "{} unclosed group(s) in {label}",
                self.depth
            )));
        }

        let mut sql = String::new();
        let mut previous_open = false;
        for entry in &self.entries {
            match entry {
                ConditionEntry::Open(logic) => {
                    push_logic(&mut sql, *logic, previous_open);
                    sql.push('(');
                    previous_open = true;
                }
                ConditionEntry::Close => {
                    sql.push(')');
                    previous_open = false;
                }
                ConditionEntry::Clause(logic, condition) => {
                    push_logic(&mut sql, *logic, previous_open);
                    sql.push_str(&compile_condition(condition)?);
                    previous_open = false;
                }
            }
        }
        Ok(sql)
    }
}

fn push_logic(sql: &mut String, logic: Logic, previous_open: bool) {
    if !sql.is_empty() && !previous_open {
        sql.push(' ');
        sql.push_str(&logic.to_string());
        sql.push(' ');
    }
}

fn compile_condition(condition: &Condition) -> Result<String> {
    // Aliases have no meaning inside a predicate
    let column = match condition.column.base() {
        Column::Name(name) if name.is_empty() => String::new(),
        base => quote_column(base)?,
    };

    let operator = if condition.value.is_null() {
        condition.operator.against_null()
    } else {
        condition.operator
    };

    let value = match (operator, condition.value.as_list()) {
        (Operator::BETWEEN, Some(bounds)) => {
            if bounds.len() != 2 {
                return Err(Error::invalid_query(format!(
                    "BETWEEN needs exactly two bounds, got {}",
                    bounds.len()
                )));
            }
            format!("{} AND {}", quote_bound(&bounds[0])?, quote_bound(&bounds[1])?)
        }
        (Operator::IN | Operator::NOT_IN, Some(items)) => {
            let quoted = items.iter().map(quote_value).collect::<Result<Vec<_>>>()?;
            format!("({})", quoted.join(","))
        }
        _ => quote_value(&condition.value)?,
    };

    Ok(format!("{column} {operator} {value}").trim().to_string())
}

fn quote_bound(bound: &Value) -> Result<String> {
    match bound {
        Value::String(s) => Ok(escape_string(s)),
        other => quote_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{op, Expression};

    fn render(logic_conditions: Vec<ConditionEntry>) -> Result<String> {
        let mut group = ConditionGroup::new();
        for entry in logic_conditions {
            match entry {
                ConditionEntry::Open(logic) => group.open(logic),
                ConditionEntry::Close => group.close(false, "WHERE")?,
                ConditionEntry::Clause(logic, condition) => group.push(logic, condition),
            }
        }
        group.to_sql("WHERE")
    }

    #[test]
    fn test_between() {
        let sql = render(vec![ConditionEntry::Clause(
            Logic::And,
            Condition::new("price", op::BETWEEN, [10, 20]),
        )])
        .unwrap();
        assert_eq!(sql, "`price` BETWEEN 10 AND 20");

        let sql = render(vec![ConditionEntry::Clause(
            Logic::And,
            Condition::new("day", op::BETWEEN, ["2024-01-01", "2024-02-01"]),
        )])
        .unwrap();
        assert_eq!(sql, "`day` BETWEEN '2024-01-01' AND '2024-02-01'");
    }

    #[test]
    fn test_between_wrong_arity() {
        let result = render(vec![ConditionEntry::Clause(
            Logic::And,
            Condition::new("price", op::BETWEEN, [10, 20, 30]),
        )]);
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
    }

    #[test]
    fn test_in_list_has_no_spaces() {
        let sql = render(vec![
            ConditionEntry::Clause(Logic::And, Condition::new("tags", op::IN, vec![1, 2, 3])),
            ConditionEntry::Clause(Logic::And, Condition::new("brand", op::NOT_IN, ["a", "b"])),
        ])
        .unwrap();
        assert_eq!(sql, "`tags` IN (1,2,3) AND `brand` NOT IN ('a','b')");
    }

    #[test]
    fn test_leading_logic_is_dropped_after_open() {
        let sql = render(vec![
            ConditionEntry::Open(Logic::Or),
            ConditionEntry::Open(Logic::Or),
            ConditionEntry::Clause(Logic::Or, Condition::new("a", op::EQ, 1)),
            ConditionEntry::Close,
            ConditionEntry::Clause(Logic::Or, Condition::new("b", op::EQ, 2)),
            ConditionEntry::Close,
        ])
        .unwrap();
        assert_eq!(sql, "((`a` = 1) OR `b` = 2)");
    }

    #[test]
    fn test_aliased_column_uses_base_name() {
        let sql = render(vec![ConditionEntry::Clause(
            Logic::And,
            Condition::new(("price", "p"), op::GT, 5),
        )])
        .unwrap();
        assert_eq!(sql, "`price` > 5");
    }

    #[test]
    fn test_expression_column_and_value() {
        let sql = render(vec![ConditionEntry::Clause(
            Logic::And,
            Condition::new(
                Expression::new("WEIGHT()"),
                op::GT,
                Expression::new("2 * :w").bind(":w", 3),
            ),
        )])
        .unwrap();
        assert_eq!(sql, "WEIGHT() > 2 * 3");
    }

    #[test]
    fn test_empty_column_name_is_trimmed() {
        let sql = render(vec![ConditionEntry::Clause(
            Logic::And,
            Condition::new("", Operator::custom("NOT"), Expression::new("deleted")),
        )])
        .unwrap();
        assert_eq!(sql, "NOT deleted");
    }

    #[test]
    fn test_close_if_empty_drops_open() {
        let mut group = ConditionGroup::new();
        group.open(Logic::And);
        group.close(true, "WHERE").unwrap();
        assert!(group.is_empty());
        assert_eq!(group.to_sql("WHERE").unwrap(), "");
    }

    #[test]
    fn test_close_without_open() {
        let mut group = ConditionGroup::new();
        assert!(matches!(
            group.close(false, "HAVING"),
            Err(Error::MalformedGroup { .. })
        ));
    }

    #[test]
    fn test_unbalanced_depth() {
        let mut group = ConditionGroup::new();
        group.open(Logic::And);
        group.push(Logic::And, Condition::new("a", op::EQ, 1));
        let err = group.to_sql("WHERE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed condition group: 1 unclosed group(s) in WHERE"
        );
        assert_eq!(group.entries.len(), 2);
    }
}
