use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tabstore::config::{DELIMITER_ENV, load_options};
use tabstore::io::{OutputFormat, load_store, save_store};
use tabstore::{DelimitedLayout, StoreOptions, TabularStore};

#[derive(Parser)]
#[command(name = "tabstore", about = "Load, edit and convert delimited text tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a delimited file to delimited text or a JSON document
    Convert {
        /// Source file
        #[arg(short, long)]
        input: PathBuf,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format. Defaults to json for `.json` destinations, delimited otherwise.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        #[command(flatten)]
        parse: ParseArgs,
    },
    /// Print the header, counts and optionally a row, a column or a search hit
    Inspect {
        /// Source file
        #[arg(short, long)]
        input: PathBuf,

        /// Print the row at this index as JSON
        #[arg(long)]
        row: Option<usize>,

        /// Print every value of this column
        #[arg(long)]
        column: Option<String>,

        /// Print the first row containing this exact value
        #[arg(long)]
        find: Option<String>,

        #[command(flatten)]
        parse: ParseArgs,
    },
    /// Apply edits to a file and write the result
    Edit {
        /// Source file
        #[arg(short, long)]
        input: PathBuf,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format. Defaults to json for `.json` destinations, delimited otherwise.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// New header names, joined by the input delimiter
        #[arg(long)]
        rename: Option<String>,

        /// Remove a column (repeatable)
        #[arg(long = "drop-column", value_name = "NAME")]
        drop_columns: Vec<String>,

        /// Remove every row where KEY equals VALUE (repeatable)
        #[arg(long = "drop-rows", value_name = "KEY=VALUE")]
        drop_rows: Vec<String>,

        /// Overwrite one cell; COLUMN is a name or `#index` (repeatable)
        #[arg(long = "set", value_name = "ROW:COLUMN=VALUE")]
        set: Vec<String>,

        #[command(flatten)]
        parse: ParseArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct ParseArgs {
    /// Input field delimiter
    #[arg(short, long, env = DELIMITER_ENV)]
    delimiter: Option<String>,

    /// Field delimiter for delimited output
    #[arg(long)]
    output_delimiter: Option<String>,

    /// Layout of the source rows
    #[arg(long, value_enum)]
    input_layout: Option<LayoutArg>,

    /// Layout of delimited output rows
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Skip blank source lines instead of reading them as rows
    #[arg(long)]
    skip_blank_lines: bool,

    /// JSON options file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Delimited,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Delimited => Self::Delimited,
            FormatArg::Json => Self::StructuredDocument,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LayoutArg {
    RowPerLine,
    ValuePerLine,
}

impl From<LayoutArg> for DelimitedLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::RowPerLine => Self::RowPerLine,
            LayoutArg::ValuePerLine => Self::ValuePerLine,
        }
    }
}

impl ParseArgs {
    fn base_options(&self) -> Result<StoreOptions> {
        match &self.config {
            Some(path) => load_options(path)
                .with_context(|| format!("Failed to load options from {}", path.display())),
            None => Ok(StoreOptions::default()),
        }
    }

    fn apply_flags(&self, mut options: StoreOptions) -> Result<StoreOptions> {
        if let Some(d) = &self.delimiter {
            options.input_delimiter.clone_from(d);
        }
        if let Some(d) = &self.output_delimiter {
            options.output_delimiter.clone_from(d);
        }
        if let Some(layout) = self.layout {
            options.delimited_layout = layout.into();
        }
        if self.skip_blank_lines {
            options.skip_blank_lines = true;
        }
        options.validate()?;
        Ok(options)
    }

    fn resolve_options(&self) -> Result<StoreOptions> {
        self.apply_flags(self.base_options()?)
    }

    /// Source layout: `--input-layout`, else the options file, else the default.
    /// `--layout` only shapes the output.
    fn source_layout(&self, base: &StoreOptions) -> DelimitedLayout {
        self.input_layout.map_or(base.delimited_layout, Into::into)
    }

    fn load(&self, input: &Path) -> Result<TabularStore> {
        let base = self.base_options()?;
        let input_layout = self.source_layout(&base);
        let options = self.apply_flags(base)?;
        let output_layout = options.delimited_layout;

        log::debug!("Reading {input_layout:?} source, writing {output_layout:?}");
        let mut store = load_store(
            input,
            StoreOptions {
                delimited_layout: input_layout,
                ..options
            },
        )?;
        store.set_delimited_layout(output_layout);
        Ok(store)
    }
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Convert {
            input,
            output,
            format,
            parse,
        } => handle_convert(&input, &output, format, &parse),
        Commands::Inspect {
            input,
            row,
            column,
            find,
            parse,
        } => handle_inspect(&input, row, column.as_deref(), find.as_deref(), &parse),
        Commands::Edit {
            input,
            output,
            format,
            rename,
            drop_columns,
            drop_rows,
            set,
            parse,
        } => {
            let edits = Edits {
                rename,
                drop_columns,
                drop_rows,
                set,
            };
            handle_edit(&input, &output, format, &edits, &parse)
        }
    }
}

fn handle_convert(
    input: &Path,
    output: &Path,
    format: Option<FormatArg>,
    parse: &ParseArgs,
) -> Result<()> {
    let store = parse.load(input)?;
    write_output(&store, output, format)?;
    println!(
        "Converted {} rows from {} to {}",
        store.row_count(),
        input.display(),
        output.display()
    );
    Ok(())
}

fn handle_inspect(
    input: &Path,
    row: Option<usize>,
    column: Option<&str>,
    find: Option<&str>,
    parse: &ParseArgs,
) -> Result<()> {
    let store = parse.load(input)?;
    println!("Header: {}", store.header().join(store.output_delimiter()));
    println!("Rows: {}", store.row_count());
    println!("Columns: {}", store.column_count());

    if let Some(index) = row {
        let row = store.get_row_at(index)?;
        println!("{}", serde_json::to_string_pretty(&row)?);
    }

    if let Some(name) = column {
        let values = store
            .get_column(name)
            .ok_or_else(|| anyhow::anyhow!("No such column: {name}"))?;
        for value in values {
            println!("{value}");
        }
    }

    if let Some(value) = find {
        match store.find_first_row_by_value(value) {
            Some(row) => println!("{}", serde_json::to_string_pretty(&row)?),
            None => println!("No row contains {value:?}"),
        }
    }
    Ok(())
}

struct Edits {
    rename: Option<String>,
    drop_columns: Vec<String>,
    drop_rows: Vec<String>,
    set: Vec<String>,
}

fn handle_edit(
    input: &Path,
    output: &Path,
    format: Option<FormatArg>,
    edits: &Edits,
    parse: &ParseArgs,
) -> Result<()> {
    let mut store = parse.load(input)?;
    apply_edits(&mut store, edits)?;
    write_output(&store, output, format)?;
    println!(
        "Wrote {} rows x {} columns to {}",
        store.row_count(),
        store.column_count(),
        output.display()
    );
    Ok(())
}

fn apply_edits(store: &mut TabularStore, edits: &Edits) -> Result<()> {
    if let Some(names) = &edits.rename {
        store
            .rename_header_line(names)
            .context("Failed to rename header")?;
    }

    for name in &edits.drop_columns {
        if !store.remove_column(name) {
            log::warn!("Column {name:?} not found, nothing dropped");
        }
    }

    for assignment in &edits.drop_rows {
        let (key, value) = split_assignment(assignment)?;
        if !store.remove_all_rows_matching(key, value) {
            log::warn!("No rows matched {key}={value}");
        }
    }

    for assignment in &edits.set {
        let (target, value) = split_assignment(assignment)?;
        let (row, column) = target
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("Expected ROW:COLUMN=VALUE, got {assignment:?}"))?;
        let row: usize = row
            .parse()
            .with_context(|| format!("Invalid row index in {assignment:?}"))?;

        match column.strip_prefix('#') {
            Some(position) => {
                let position: usize = position
                    .parse()
                    .with_context(|| format!("Invalid column index in {assignment:?}"))?;
                store.set_value_at_position(row, position, value)?;
            }
            None => store.set_value_at(row, column, value)?,
        }
    }
    Ok(())
}

fn split_assignment(text: &str) -> Result<(&str, &str)> {
    text.split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected KEY=VALUE, got {text:?}"))
}

fn write_output(store: &TabularStore, output: &Path, format: Option<FormatArg>) -> Result<()> {
    let format = format.map_or_else(|| OutputFormat::from_path(output), Into::into);
    save_store(store, output, format)
        .with_context(|| format!("Failed to write {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    fn sample() -> TabularStore {
        let mut store = TabularStore::with_header(["id", "name", "team"], ",").unwrap();
        store.add_row(["1", "Alice", "red"]).unwrap();
        store.add_row(["2", "Bob", "blue"]).unwrap();
        store
    }

    #[test]
    fn test_apply_edits() -> Result<()> {
        let mut store = sample();
        let edits = Edits {
            rename: Some("key,person,team".to_owned()),
            drop_columns: vec!["team".to_owned()],
            drop_rows: vec!["person=Alice".to_owned()],
            set: vec!["0:person=Robert".to_owned(), "0:#0=20".to_owned()],
        };

        apply_edits(&mut store, &edits)?;
        assert_eq!(store.render_delimited(), "key,person\n20,Robert\n");
        Ok(())
    }

    #[test]
    fn test_apply_edits_rejects_bad_assignment() {
        let mut store = sample();
        let edits = Edits {
            rename: None,
            drop_columns: vec![],
            drop_rows: vec![],
            set: vec!["x:name=oops".to_owned()],
        };
        assert!(apply_edits(&mut store, &edits).is_err());
    }

    #[test]
    fn test_flags_override_defaults() -> Result<()> {
        let cli = Cli::try_parse_from([
            "tabstore",
            "convert",
            "-i",
            "in.txt",
            "-o",
            "out.txt",
            "--delimiter",
            ";",
            "--layout",
            "value-per-line",
        ])?;
        let Commands::Convert { parse, .. } = cli.command else {
            anyhow::bail!("expected convert");
        };

        let options = parse.resolve_options()?;
        assert_eq!(options.input_delimiter, ";");
        assert_eq!(options.output_delimiter, ",");
        assert_eq!(options.delimited_layout, DelimitedLayout::ValuePerLine);
        assert_eq!(
            parse.source_layout(&parse.base_options()?),
            DelimitedLayout::RowPerLine
        );
        Ok(())
    }

    #[test]
    fn test_output_layout_does_not_change_how_input_is_read() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let input = dir.path().join("people.csv");
        std::fs::write(&input, "id,name\n1,Alice\n2,Bob\n")?;

        let cli = Cli::try_parse_from([
            "tabstore",
            "convert",
            "-i",
            "people.csv",
            "-o",
            "people.txt",
            "--layout",
            "value-per-line",
        ])?;
        let Commands::Convert { parse, .. } = cli.command else {
            anyhow::bail!("expected convert");
        };

        let store = parse.load(&input)?;
        assert_eq!(store.row_count(), 2);
        assert_eq!(
            store.render_delimited(),
            "id,name\n1,\nAlice\n\n2,\nBob\n\n"
        );
        Ok(())
    }

    #[test]
    fn test_options_file_layout_applies_to_input() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let input = dir.path().join("legacy.txt");
        let config = dir.path().join("options.json");
        std::fs::write(&input, "id,name\n1,\nAlice\n\n")?;
        std::fs::write(&config, r#"{ "delimited_layout": "value_per_line" }"#)?;

        let cli = Cli::try_parse_from([
            "tabstore",
            "convert",
            "-i",
            "legacy.txt",
            "-o",
            "out.csv",
            "--config",
            config.to_str().unwrap(),
            "--layout",
            "row-per-line",
        ])?;
        let Commands::Convert { parse, .. } = cli.command else {
            anyhow::bail!("expected convert");
        };

        let store = parse.load(&input)?;
        assert_eq!(store.render_delimited(), "id,name\n1,Alice\n");
        Ok(())
    }
}
