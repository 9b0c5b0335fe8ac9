use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::flowers::*;

pub fn read_xlsx_table(path: &str, worksheet_name: Option<&str>) -> FlowerResult<Table> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let columns: Vec<String> = header
        .iter()
        .map(|cell| read_cell(cell, path, 1))
        .collect::<FlowerResult<Vec<String>>>()?;
    debug!("read_xlsx_table: header: {:?}", columns);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // The header is row 1, as displayed by the spreadsheet programs.
        let lineno = idx + 2;
        let cells: Vec<String> = row
            .iter()
            .map(|cell| read_cell(cell, path, lineno))
            .collect::<FlowerResult<Vec<String>>>()?;
        // Formatted but empty rows at the end of a sheet.
        if cells.iter().all(|c| c.is_empty()) {
            debug!("read_xlsx_table: skipping empty row {}", lineno);
            continue;
        }
        rows.push(cells);
    }
    Ok(Table { columns, rows })
}

/// The text content of a cell.
///
/// Identifiers are often stored as numbers: integral values are written without
/// a fractional part so that `12345.0` and `"12345"` refer to the same employee.
pub fn read_cell(cell: &DataType, path: &str, lineno: usize) -> FlowerResult<String> {
    match cell {
        DataType::String(s) => Ok(s.trim().to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::DateTime(f) => Ok(f.to_string()),
        DataType::Empty => Ok("".to_string()),
        other => ExcelWrongCellTypeSnafu {
            path,
            lineno,
            content: format!("{:?}", other),
        }
        .fail(),
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> FlowerResult<calamine::Range<DataType>> {
    debug!(
        "read_xlsx_table: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        // Otherwise the first worksheet, the way the spreadsheet exports are laid out.
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}
