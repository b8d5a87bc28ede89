pub fn render_schema(vector_dim: u32) -> String {
	include_str!("../../../sql/init.sql").replace("<VECTOR_DIM>", &vector_dim.to_string())
}

/// Splits rendered schema into executable statements.
pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn substitutes_vector_dimension() {
		let sql = render_schema(512);

		assert!(sql.contains("vector(512)"));
		assert!(!sql.contains("<VECTOR_DIM>"));
	}

	#[test]
	fn splits_into_non_empty_statements() {
		let sql = render_schema(8);
		let statements: Vec<&str> = statements(&sql).collect();

		assert!(statements.iter().all(|statement| !statement.is_empty()));
		assert!(
			statements
				.iter()
				.any(|statement| statement.starts_with("CREATE TABLE IF NOT EXISTS items"))
		);
	}
}
