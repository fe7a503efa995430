use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BindConfig;
use crate::error::{SheetBindError, SheetBindResult};
use crate::excel::ExcelImporter;
use crate::settings::SheetImportSettings;
use crate::sheet::TabularSheet;
use crate::types::RawTable;

/// Options of the import command
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub sheet: usize,
    pub no_header: bool,
    pub break_on_error: bool,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Execute the sheets command
pub fn sheets(input: PathBuf) -> SheetBindResult<()> {
    println!("{}", "📒 sheetbind - Workbook Sheets".bold().green());
    println!("   File: {}\n", input.display());

    let importer = ExcelImporter::open(&input)?;
    let workbook = importer.workbook();
    if workbook.is_empty() {
        println!("{}", "   (no sheets)".yellow());
        return Ok(());
    }

    for (idx, sheet) in workbook.sheets().iter().enumerate() {
        let (rows, cols) = sheet.dimensions();
        println!(
            "   {:>3}. {} {}",
            idx + 1,
            sheet.name().bright_blue(),
            format!("({} rows × {} columns)", rows, cols).dimmed()
        );
    }
    println!();
    Ok(())
}

/// Execute the import command
pub fn import(input: PathBuf, output: PathBuf, options: ImportOptions) -> SheetBindResult<()> {
    println!("{}", "📥 sheetbind - Excel Import".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let settings = resolve_import_settings(&options)?;

    if options.verbose {
        println!("{}", "📖 Reading Excel file...".cyan());
    }
    let importer = ExcelImporter::open(&input)?;
    let table = importer.import_as_raw(options.sheet, &settings)?;

    if options.verbose {
        let names = importer.sheet_names();
        let name = names.get(options.sheet - 1).map(String::as_str).unwrap_or("?");
        println!("   📊 Sheet {}: {}", options.sheet, name.bright_blue());
        println!(
            "      {} columns, {} rows\n",
            table.headers.as_ref().map(Vec::len).unwrap_or_else(|| {
                table.values.first().map(Vec::len).unwrap_or(0)
            }),
            table.row_count()
        );
        println!("{}", "💾 Writing output file...".cyan());
    }

    fs::write(&output, render_table(&table, &output)?)?;

    println!("{}", "✅ Import Complete!".bold().green());
    println!("   {} rows → {}\n", table.row_count(), output.display());
    Ok(())
}

/// Config file first, command line flags on top
fn resolve_import_settings(options: &ImportOptions) -> SheetBindResult<SheetImportSettings> {
    let mut settings = match &options.config {
        Some(path) => {
            let config = BindConfig::load(path)?;
            config.apply_culture()?;
            config.import
        }
        None => SheetImportSettings::default(),
    };
    if options.no_header {
        settings.has_header = false;
    }
    if options.break_on_error {
        settings.break_on_error = true;
    }
    Ok(settings)
}

/// JSON for a `.json` output path, YAML otherwise
fn render_table(table: &RawTable, output: &Path) -> SheetBindResult<String> {
    let is_json = output
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        serde_json::to_string_pretty(table)
            .map_err(|e| SheetBindError::Failed(format!("Failed to serialize JSON: {}", e)))
    } else {
        Ok(serde_yaml::to_string(table)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_table() -> RawTable {
        RawTable {
            headers: Some(vec!["Name".to_string(), "Age".to_string()]),
            values: vec![vec![CellValue::from("Ada"), CellValue::Int(36)]],
        }
    }

    #[test]
    fn test_render_table_json() {
        let json = render_table(&sample_table(), Path::new("out.JSON")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["headers"][0], "Name");
        assert_eq!(parsed["values"][0][1], 36);
    }

    #[test]
    fn test_render_table_yaml() {
        let yaml = render_table(&sample_table(), Path::new("out.yaml")).unwrap();
        assert!(yaml.contains("headers:"));
        assert!(yaml.contains("Ada"));
    }

    #[test]
    fn test_flags_override_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "import:\n  has_header: true\n  break_on_error: false").unwrap();

        let options = ImportOptions {
            sheet: 1,
            no_header: true,
            break_on_error: true,
            config: Some(file.path().to_path_buf()),
            verbose: false,
        };
        let settings = resolve_import_settings(&options).unwrap();
        assert!(!settings.has_header);
        assert!(settings.break_on_error);
    }

    #[test]
    fn test_missing_config_is_reported() {
        let options = ImportOptions {
            sheet: 1,
            config: Some(PathBuf::from("/nonexistent/sheetbind.yaml")),
            ..Default::default()
        };
        assert!(matches!(
            resolve_import_settings(&options),
            Err(SheetBindError::Config(_))
        ));
    }
}
