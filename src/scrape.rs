//! Parsing for the JMA daily-observation page. Fetching lives in the
//! `fetch-humidity` binary; everything here is pure so it can be tested
//! offline against captured HTML.

/// Column layout of the daily table on `daily_s1.php`.
const DAY_COLUMN: usize = 0;
const TEMPERATURE_COLUMN: usize = 6;
const HUMIDITY_COLUMN: usize = 9;

/// One scraped day. Field names match the CSV header the rest of the
/// pipeline reads back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyWeather {
    pub day: u32,
    pub avg_humidity: f64,
    pub avg_temperature: f64,
}

/// URL of the daily-observation table for one station and month.
/// Tokyo is prec_no=44, block_no=47662.
pub fn daily_observations_url(prec_no: u32, block_no: u32, year: i32, month: u32) -> String {
    format!(
        "https://www.data.jma.go.jp/obd/stats/etrn/view/daily_s1.php?prec_no={}&block_no={}&year={}&month={}&day=&view=",
        prec_no, block_no, year, month
    )
}

/// Extracts every `<tr>` of the document as a list of cell texts.
/// Tag matching is case-insensitive and attribute-tolerant; nested markup
/// inside a cell is stripped and whitespace collapsed. Deliberately not a
/// full HTML parser, just enough to read one well-behaved table page.
pub fn extract_table_rows(html: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current_row: Option<Vec<String>> = None;
    let mut current_cell: Option<String> = None;

    let mut rest = html;
    while let Some(lt) = rest.find('<') {
        if let Some(cell) = current_cell.as_mut() {
            cell.push_str(&rest[..lt]);
        }
        let after = &rest[lt + 1..];
        let Some(gt) = after.find('>') else {
            break;
        };
        let tag = &after[..gt];
        let (closing, raw_name) = match tag.strip_prefix('/') {
            Some(name) => (true, name),
            None => (false, tag),
        };
        let name = raw_name
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        match (closing, name.as_str()) {
            (false, "tr") => {
                // An unterminated previous row still counts.
                close_cell(&mut current_row, &mut current_cell);
                close_row(&mut rows, &mut current_row);
                current_row = Some(Vec::new());
            }
            (true, "tr") => {
                close_cell(&mut current_row, &mut current_cell);
                close_row(&mut rows, &mut current_row);
            }
            (false, "td") | (false, "th") => {
                if current_row.is_some() {
                    close_cell(&mut current_row, &mut current_cell);
                    current_cell = Some(String::new());
                }
            }
            (true, "td") | (true, "th") => {
                close_cell(&mut current_row, &mut current_cell);
            }
            _ => {}
        }

        rest = &after[gt + 1..];
    }
    close_cell(&mut current_row, &mut current_cell);
    close_row(&mut rows, &mut current_row);
    rows
}

fn close_cell(row: &mut Option<Vec<String>>, cell: &mut Option<String>) {
    if let (Some(row), Some(cell)) = (row.as_mut(), cell.take()) {
        row.push(clean_cell(&cell));
    }
}

fn close_row(rows: &mut Vec<Vec<String>>, row: &mut Option<Vec<String>>) {
    if let Some(row) = row.take() {
        if !row.is_empty() {
            rows.push(row);
        }
    }
}

fn clean_cell(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pulls a float out of a cell, dropping the quality-flag characters the
/// JMA tables append to uncertain values (`5.4 )`, `89]`).
fn extract_float(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().ok()
}

/// Keeps the rows that look like daily observations: a day number in the
/// first column and parseable humidity/temperature values. Header rows,
/// summary rows and days with missing readings are dropped.
pub fn parse_daily_rows(rows: &[Vec<String>]) -> Vec<DailyWeather> {
    let mut out = Vec::new();
    for row in rows {
        if row.len() <= HUMIDITY_COLUMN {
            continue;
        }
        let day_digits: String = row[DAY_COLUMN]
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let Ok(day) = day_digits.parse::<u32>() else {
            continue;
        };
        if !(1..=31).contains(&day) {
            continue;
        }
        let Some(avg_temperature) = extract_float(&row[TEMPERATURE_COLUMN]) else {
            continue;
        };
        let Some(avg_humidity) = extract_float(&row[HUMIDITY_COLUMN]) else {
            continue;
        };
        out.push(DailyWeather {
            day,
            avg_humidity,
            avg_temperature,
        });
    }
    out
}
