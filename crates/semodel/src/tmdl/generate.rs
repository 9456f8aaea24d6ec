//! TMDL document generation for database, model, expressions, tables, and
//! relationships.
//!
//! Every generator validates its output against the tab-only indentation
//! rule before returning, and every collection is explicitly sorted so the
//! emitted bytes never depend on container iteration order.

use std::collections::BTreeMap;

use crate::config::KeyPrefixConfig;
use crate::error::Result;
use crate::ident::stable_id;
use crate::inference::Relationship;
use crate::schema::{Classification, ColumnMetadata, TableMetadata, TmdlType};

use super::quote::quote_identifier;
use super::whitespace::{indent, validate_indentation};

/// DirectLake source expression body. Opaque M code: passed through
/// byte-for-byte, never reformatted.
const DIRECT_LAKE_SOURCE: &str = "AzureStorage.DataLake(\"\", [HierarchicalNavigation=true])";

/// Generate `definition/database.tmdl`.
pub fn database_tmdl() -> Result<String> {
    let content = format!("database\n{}compatibilityLevel: 1604\n", indent(1));
    validate_indentation("definition/database.tmdl", &content)?;
    Ok(content)
}

/// Generate `definition/model.tmdl`.
///
/// Tables are referenced in emission order: dimensions first, then facts,
/// then unclassified, alphabetical by (schema, table) within each group.
pub fn model_tmdl(
    tables: &[TableMetadata],
    classifications: &BTreeMap<(String, String), Classification>,
) -> Result<String> {
    let sorted = sort_tables(tables, classifications);

    let mut lines = vec![
        "model Model".to_string(),
        format!("{}culture: en-US", indent(1)),
        format!("{}defaultPowerBIDataSourceVersion: powerBI_V3", indent(1)),
        format!("{}discourageImplicitMeasures", indent(1)),
        String::new(),
    ];
    for table in &sorted {
        lines.push(format!("ref table {}", quote_identifier(&table.table_name)?));
    }

    let content = lines.join("\n") + "\n";
    validate_indentation("definition/model.tmdl", &content)?;
    Ok(content)
}

/// Generate `definition/expressions.tmdl` with the DirectLake expression.
pub fn expressions_tmdl(catalog_name: &str) -> Result<String> {
    let expression_name = format!("DirectLake - {catalog_name}");
    let lineage_tag = stable_id("expression", &[catalog_name])?;

    let content = format!(
        "expression {name} =\n\
         {i2}let\n\
         {i3}Source = {source}\n\
         {i2}in\n\
         {i3}Source\n\
         {i1}lineageTag: {tag}\n\
         \n\
         {i1}annotation PBI_IncludeFutureArtifacts = False\n",
        name = quote_identifier(&expression_name)?,
        source = DIRECT_LAKE_SOURCE,
        tag = lineage_tag,
        i1 = indent(1),
        i2 = indent(2),
        i3 = indent(3),
    );

    validate_indentation("definition/expressions.tmdl", &content)?;
    Ok(content)
}

/// Generate the TMDL section for a single column.
fn column_tmdl(column: &ColumnMetadata, table_qualified_name: &str) -> Result<String> {
    let tmdl_type = TmdlType::from_sql(&column.sql_type)?;
    let lineage_tag = stable_id(
        "column",
        &[&format!("{table_qualified_name}.{}", column.name)],
    )?;

    Ok(format!(
        "{i1}column {name}\n\
         {i2}dataType: {ty}\n\
         {i2}lineageTag: {tag}\n\
         {i2}summarizeBy: none\n\
         {i2}sourceColumn: {source}\n\
         \n\
         {i2}annotation SummarizationSetBy = Automatic\n",
        name = quote_identifier(&column.name)?,
        ty = tmdl_type,
        tag = lineage_tag,
        source = quote_identifier(&column.name)?,
        i1 = indent(1),
        i2 = indent(2),
    ))
}

/// Generate the DirectLake partition section for a table.
fn partition_tmdl(table: &TableMetadata, catalog_name: &str) -> Result<String> {
    let expression_name = format!("DirectLake - {catalog_name}");

    Ok(format!(
        "{i1}partition {name} = entity\n\
         {i2}mode: directLake\n\
         {i2}source\n\
         {i3}entityName: {entity}\n\
         {i3}schemaName: {schema}\n\
         {i3}expressionSource: {expr}\n",
        name = quote_identifier(&table.table_name)?,
        entity = quote_identifier(&table.table_name)?,
        schema = quote_identifier(&table.schema_name)?,
        expr = quote_identifier(&expression_name)?,
        i1 = indent(1),
        i2 = indent(2),
        i3 = indent(3),
    ))
}

/// Generate the complete TMDL document for a table.
///
/// Columns are emitted key columns first, alphabetical within each group.
pub fn table_tmdl(
    table: &TableMetadata,
    config: &KeyPrefixConfig,
    catalog_name: &str,
) -> Result<String> {
    let lineage_tag = stable_id("table", &[&table.qualified_name()])?;

    let mut key_columns: Vec<&ColumnMetadata> = table
        .columns
        .iter()
        .filter(|c| config.is_key_column(&c.name))
        .collect();
    let mut other_columns: Vec<&ColumnMetadata> = table
        .columns
        .iter()
        .filter(|c| !config.is_key_column(&c.name))
        .collect();
    key_columns.sort_by(|a, b| a.name.cmp(&b.name));
    other_columns.sort_by(|a, b| a.name.cmp(&b.name));

    let qualified = table.qualified_name();
    let mut column_sections = String::new();
    for column in key_columns.into_iter().chain(other_columns) {
        column_sections.push_str(&column_tmdl(column, &qualified)?);
    }

    let content = format!(
        "table {name}\n\
         {i1}lineageTag: {tag}\n\
         \n\
         {partition}\n\
         {columns}",
        name = quote_identifier(&table.table_name)?,
        tag = lineage_tag,
        partition = partition_tmdl(table, catalog_name)?,
        columns = column_sections,
        i1 = indent(1),
    );

    validate_indentation(&table_document_path(table), &content)?;
    Ok(content)
}

/// Document path for a table's TMDL file.
pub fn table_document_path(table: &TableMetadata) -> String {
    format!("definition/tables/{}.tmdl", table.table_name)
}

/// Generate `definition/relationships.tmdl`.
///
/// Active relationships omit `isActive` (the format's default); inactive
/// ones emit `isActive: false`. Endpoint references use the unqualified
/// table name with the same quoting rule as everywhere else.
pub fn relationships_tmdl(relationships: &[Relationship]) -> Result<String> {
    if relationships.is_empty() {
        return Ok(String::new());
    }

    let mut sorted: Vec<&Relationship> = relationships.iter().collect();
    sorted.sort_by(|a, b| {
        (!a.is_active, &a.from_table, &a.from_column, &a.to_table, &a.to_column).cmp(&(
            !b.is_active,
            &b.from_table,
            &b.from_column,
            &b.to_table,
            &b.to_column,
        ))
    });

    let mut sections: Vec<String> = Vec::new();
    for rel in sorted {
        let mut lines = vec![format!("relationship {}", rel.id)];
        if !rel.is_active {
            lines.push(format!("{}isActive: false", indent(1)));
        }
        lines.push(format!(
            "{}fromColumn: {}.{}",
            indent(1),
            quote_identifier(unqualified_name(&rel.from_table))?,
            quote_identifier(&rel.from_column)?,
        ));
        lines.push(format!(
            "{}toColumn: {}.{}",
            indent(1),
            quote_identifier(unqualified_name(&rel.to_table))?,
            quote_identifier(&rel.to_column)?,
        ));
        sections.push(lines.join("\n"));
    }

    let content = sections.join("\n\n") + "\n";
    validate_indentation("definition/relationships.tmdl", &content)?;
    Ok(content)
}

/// Emission order for tables: (classification rank, schema, table).
pub fn sort_tables<'a>(
    tables: &'a [TableMetadata],
    classifications: &BTreeMap<(String, String), Classification>,
) -> Vec<&'a TableMetadata> {
    let mut sorted: Vec<&TableMetadata> = tables.iter().collect();
    sorted.sort_by_key(|t| {
        let classification = classifications
            .get(&t.key())
            .copied()
            .unwrap_or(Classification::Unclassified);
        (classification.rank(), t.schema_name.clone(), t.table_name.clone())
    });
    sorted
}

/// Strip the schema qualifier from `schema.table`.
fn unqualified_name(qualified: &str) -> &str {
    qualified.split_once('.').map_or(qualified, |(_, t)| t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::CrossFilterDirection;
    use uuid::Uuid;

    fn column(name: &str, sql_type: &str, ordinal: usize) -> ColumnMetadata {
        ColumnMetadata::new(name, sql_type, false, ordinal)
    }

    fn relationship(
        from_table: &str,
        from_column: &str,
        to_table: &str,
        to_column: &str,
        is_active: bool,
    ) -> Relationship {
        Relationship {
            id: stable_id("relationship", &[from_table, from_column, to_table, to_column])
                .unwrap(),
            from_table: from_table.to_string(),
            from_column: from_column.to_string(),
            to_table: to_table.to_string(),
            to_column: to_column.to_string(),
            is_active,
            cross_filtering_behavior: CrossFilterDirection::OneDirection,
        }
    }

    #[test]
    fn test_database_tmdl() {
        let content = database_tmdl().unwrap();
        assert_eq!(content, "database\n\tcompatibilityLevel: 1604\n");
    }

    #[test]
    fn test_model_tmdl_orders_dimensions_before_facts() {
        let tables = vec![
            TableMetadata::new("dbo", "FactSales", vec![column("SK_A", "bigint", 1)]),
            TableMetadata::new("dbo", "DimCustomer", vec![column("SK_B", "bigint", 1)]),
        ];
        let classifications: BTreeMap<(String, String), Classification> = [
            (
                ("dbo".to_string(), "FactSales".to_string()),
                Classification::Fact,
            ),
            (
                ("dbo".to_string(), "DimCustomer".to_string()),
                Classification::Dimension,
            ),
        ]
        .into();

        let content = model_tmdl(&tables, &classifications).unwrap();

        assert!(content.starts_with("model Model\n\tculture: en-US\n"));
        assert!(content.contains("\tdiscourageImplicitMeasures\n"));
        let dim_pos = content.find("ref table DimCustomer").unwrap();
        let fact_pos = content.find("ref table FactSales").unwrap();
        assert!(dim_pos < fact_pos);
    }

    #[test]
    fn test_model_tmdl_quotes_table_names() {
        let tables = vec![TableMetadata::new(
            "dbo",
            "Order Lines",
            vec![column("SK_Line", "bigint", 1)],
        )];
        let classifications: BTreeMap<(String, String), Classification> = [(
            ("dbo".to_string(), "Order Lines".to_string()),
            Classification::Dimension,
        )]
        .into();

        let content = model_tmdl(&tables, &classifications).unwrap();
        assert!(content.contains("ref table 'Order Lines'"));
    }

    #[test]
    fn test_expressions_tmdl_has_opaque_source_and_stable_tag() {
        let a = expressions_tmdl("MyLakehouse").unwrap();
        let b = expressions_tmdl("MyLakehouse").unwrap();
        assert_eq!(a, b);

        assert!(a.starts_with("expression 'DirectLake - MyLakehouse' =\n"));
        assert!(a.contains(DIRECT_LAKE_SOURCE));
        assert!(a.contains("\tannotation PBI_IncludeFutureArtifacts = False\n"));
    }

    #[test]
    fn test_table_tmdl_key_columns_first_then_alphabetical() {
        let config = KeyPrefixConfig::new(["SK_"]).unwrap();
        let table = TableMetadata::new(
            "dbo",
            "FactSales",
            vec![
                column("Qty", "int", 1),
                column("SK_Product", "bigint", 2),
                column("Amount", "decimal", 3),
                column("SK_Customer", "bigint", 4),
            ],
        );

        let content = table_tmdl(&table, &config, "Lake").unwrap();

        let positions: Vec<usize> = ["SK_Customer", "SK_Product", "Amount", "Qty"]
            .iter()
            .map(|name| content.find(&format!("column {name}\n")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_table_tmdl_partition_references_source() {
        let config = KeyPrefixConfig::new(["SK_"]).unwrap();
        let table = TableMetadata::new("dbo", "DimDate", vec![column("SK_Date", "date", 1)]);

        let content = table_tmdl(&table, &config, "Lake").unwrap();

        assert!(content.contains("\tpartition DimDate = entity\n"));
        assert!(content.contains("\t\tmode: directLake\n"));
        assert!(content.contains("\t\t\tentityName: DimDate\n"));
        assert!(content.contains("\t\t\tschemaName: dbo\n"));
        assert!(content.contains("\t\t\texpressionSource: 'DirectLake - Lake'\n"));
        assert!(content.contains("\t\tdataType: dateTime\n"));
    }

    #[test]
    fn test_table_tmdl_unsupported_type_fails() {
        let config = KeyPrefixConfig::new(["SK_"]).unwrap();
        let table = TableMetadata::new(
            "dbo",
            "DimGeo",
            vec![column("SK_Geo", "bigint", 1), column("Shape", "geometry", 2)],
        );

        assert!(table_tmdl(&table, &config, "Lake").is_err());
    }

    #[test]
    fn test_relationships_tmdl_empty_input() {
        assert_eq!(relationships_tmdl(&[]).unwrap(), "");
    }

    #[test]
    fn test_relationships_tmdl_active_omits_marker() {
        let rels = vec![relationship(
            "dbo.FactSales",
            "SK_Customer",
            "dbo.DimCustomer",
            "SK_Customer",
            true,
        )];

        let content = relationships_tmdl(&rels).unwrap();

        assert!(!content.contains("isActive"));
        assert!(content.contains("\tfromColumn: FactSales.SK_Customer\n"));
        assert!(content.contains("\ttoColumn: DimCustomer.SK_Customer\n"));
    }

    #[test]
    fn test_relationships_tmdl_inactive_emits_marker() {
        let rels = vec![relationship(
            "dbo.Sales",
            "SK_ShipDate",
            "dbo.Date",
            "SK_Date",
            false,
        )];

        let content = relationships_tmdl(&rels).unwrap();
        assert!(content.contains("\tisActive: false\n"));
    }

    #[test]
    fn test_relationships_tmdl_quotes_endpoints() {
        let rels = vec![relationship(
            "dbo.Sales Orders",
            "SK_Customer",
            "dbo.Customer's Region",
            "SK_Region",
            true,
        )];

        let content = relationships_tmdl(&rels).unwrap();
        assert!(content.contains("fromColumn: 'Sales Orders'.SK_Customer"));
        assert!(content.contains("toColumn: 'Customer''s Region'.SK_Region"));
    }

    #[test]
    fn test_relationships_tmdl_sorted_active_first() {
        let rels = vec![
            relationship("dbo.Sales", "SK_ShipDate", "dbo.Date", "SK_Date", false),
            relationship("dbo.Sales", "SK_Customer", "dbo.Customer", "SK_Customer", true),
            relationship("dbo.Sales", "SK_OrderDate", "dbo.Date", "SK_Date", true),
        ];
        let shuffled = vec![rels[0].clone(), rels[2].clone(), rels[1].clone()];

        let a = relationships_tmdl(&rels).unwrap();
        let b = relationships_tmdl(&shuffled).unwrap();
        assert_eq!(a, b);

        let ship = a.find(&rels[0].id.to_string()).unwrap();
        let customer = a.find(&rels[1].id.to_string()).unwrap();
        let order = a.find(&rels[2].id.to_string()).unwrap();
        assert!(customer < order);
        assert!(order < ship);
    }

    #[test]
    fn test_relationship_ids_nonzero_uuid() {
        let rel = relationship("dbo.A", "SK_B", "dbo.C", "SK_D", true);
        assert_ne!(rel.id, Uuid::nil());
    }
}
