// Primitives for reading CSV files.

use crate::flowers::*;

pub fn read_csv_table(path: &str) -> FlowerResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let columns: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            // Spreadsheet programs like to start UTF-8 exports with a byte order mark.
            let s = if idx == 0 {
                s.trim_start_matches('\u{feff}')
            } else {
                s
            };
            s.trim().to_string()
        })
        .collect();
    debug!("read_csv_table: {:?}: header: {:?}", path, columns);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(Table { columns, rows })
}
