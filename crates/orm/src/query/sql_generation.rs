//! Query Builder SQL generation

use super::builder::QueryBuilder;
use super::types::*;
use crate::backends::{DatabaseValue, Statement};

impl QueryBuilder {
    /// Generate SQL with `$N` placeholders and the parameters in binding order
    pub fn to_sql_with_params(&self) -> (String, Vec<DatabaseValue>) {
        match self.query_type {
            QueryType::Select => self.build_select_sql(),
            QueryType::Insert => self.build_insert_sql(),
            QueryType::Delete => self.build_delete_sql(),
        }
    }

    /// Finish the builder into an executable statement
    pub fn to_statement(&self) -> Statement {
        let (sql, params) = self.to_sql_with_params();
        Statement::new(sql, params)
    }

    /// Convert the query to SQL string
    pub fn to_sql(&self) -> String {
        self.to_sql_with_params().0
    }

    /// Build SELECT SQL with parameters
    fn build_select_sql(&self) -> (String, Vec<DatabaseValue>) {
        let mut sql = String::new();
        let mut params = Vec::new();

        // SELECT clause
        sql.push_str("SELECT ");

        if self.select_fields.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_fields.join(", "));
        }

        // FROM clause
        if !self.from_tables.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.from_tables.join(", "));
        }

        // JOIN clauses
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.join_type.to_string());
            sql.push(' ');
            sql.push_str(&join.table);
            sql.push_str(" ON ");
            for (i, (left, right)) in join.on_conditions.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                sql.push_str(&format!("{} = {}", left, right));
            }
        }

        self.build_where_clause(&mut sql, &mut params);
        self.build_order_clause(&mut sql);

        (sql, params)
    }

    /// Build INSERT SQL with parameters
    fn build_insert_sql(&self) -> (String, Vec<DatabaseValue>) {
        let mut sql = String::new();
        let mut params = Vec::new();

        if let Some(table) = &self.insert_table {
            sql.push_str(&format!("INSERT INTO {}", table));

            if !self.set_clauses.is_empty() {
                sql.push_str(" (");
                let columns: Vec<&str> = self
                    .set_clauses
                    .iter()
                    .map(|clause| clause.column.as_str())
                    .collect();
                sql.push_str(&columns.join(", "));
                sql.push_str(") VALUES (");

                for (i, clause) in self.set_clauses.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    if clause.value.is_null() {
                        sql.push_str("NULL");
                    } else {
                        params.push(clause.value.clone());
                        sql.push_str(&format!("${}", params.len()));
                    }
                }
                sql.push(')');
            }

            self.build_returning_clause(&mut sql);
        }

        (sql, params)
    }

    /// Build DELETE SQL with parameters
    fn build_delete_sql(&self) -> (String, Vec<DatabaseValue>) {
        let mut sql = String::new();
        let mut params = Vec::new();

        if let Some(table) = &self.delete_table {
            sql.push_str(&format!("DELETE FROM {}", table));
            self.build_where_clause(&mut sql, &mut params);
            self.build_returning_clause(&mut sql);
        }

        (sql, params)
    }

    /// Helper method to build WHERE clauses
    fn build_where_clause(&self, sql: &mut String, params: &mut Vec<DatabaseValue>) {
        if self.where_conditions.is_empty() {
            return;
        }

        sql.push_str(" WHERE ");
        for (i, condition) in self.where_conditions.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }

            match condition.operator {
                QueryOperator::In if condition.values.is_empty() => {
                    // An empty IN-list matches nothing.
                    sql.push_str("1 = 0");
                }
                QueryOperator::In => {
                    sql.push_str(&condition.column);
                    sql.push_str(" IN (");
                    for (j, value) in condition.values.iter().enumerate() {
                        if j > 0 {
                            sql.push_str(", ");
                        }
                        params.push(value.clone());
                        sql.push_str(&format!("${}", params.len()));
                    }
                    sql.push(')');
                }
                QueryOperator::Equal => {
                    sql.push_str(&format!("{} {}", condition.column, condition.operator));
                    if let Some(ref value) = condition.value {
                        params.push(value.clone());
                        sql.push_str(&format!(" ${}", params.len()));
                    }
                }
            }
        }
    }

    /// Helper method to build ORDER BY clause
    fn build_order_clause(&self, sql: &mut String) {
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, (column, direction)) in self.order_by.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&format!("{} {}", column, direction));
            }
        }
    }

    fn build_returning_clause(&self, sql: &mut String) {
        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_with_left_join_and_filter() {
        let (sql, params) = QueryBuilder::new()
            .select("r.id AS root_id, c.id AS child_id")
            .from("roots r")
            .left_join("children c", "c.root_id", "r.id")
            .where_eq("r.id", 42i64)
            .order_by("r.id")
            .order_by("c.order_index")
            .to_sql_with_params();

        assert_eq!(
            sql,
            "SELECT r.id AS root_id, c.id AS child_id FROM roots r \
             LEFT JOIN children c ON c.root_id = r.id \
             WHERE r.id = $1 ORDER BY r.id ASC, c.order_index ASC"
        );
        assert_eq!(params, vec![DatabaseValue::Int64(42)]);
    }

    #[test]
    fn test_where_in_numbers_placeholders_in_order() {
        let (sql, params) = QueryBuilder::new()
            .select("*")
            .from("children")
            .where_eq("resource_id", 5i64)
            .where_in("root_id", vec![1i64, 2, 3])
            .to_sql_with_params();

        assert_eq!(
            sql,
            "SELECT * FROM children WHERE resource_id = $1 AND root_id IN ($2, $3, $4)"
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_empty_in_list_matches_nothing() {
        let sql = QueryBuilder::new()
            .from("roots")
            .where_in("id", Vec::<i64>::new())
            .to_sql();
        assert_eq!(sql, "SELECT * FROM roots WHERE 1 = 0");
    }

    #[test]
    fn test_insert_renders_null_inline() {
        let (sql, params) = QueryBuilder::new()
            .insert_into("roots")
            .set("name", "alice")
            .set("image_url", None::<String>)
            .returning("id")
            .to_sql_with_params();

        assert_eq!(
            sql,
            "INSERT INTO roots (name, image_url) VALUES ($1, NULL) RETURNING id"
        );
        assert_eq!(params, vec![DatabaseValue::String("alice".into())]);
    }

    #[test]
    fn test_delete_with_returning() {
        let statement = QueryBuilder::new()
            .delete_from("roots")
            .where_eq("id", 9i64)
            .returning("id")
            .to_statement();

        assert_eq!(statement.sql, "DELETE FROM roots WHERE id = $1 RETURNING id");
        assert_eq!(statement.params, vec![DatabaseValue::Int64(9)]);
    }
}
