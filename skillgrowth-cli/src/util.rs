use skillgrowth_core::constants::EMPTY_PLACEHOLDER;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn csv_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Markdown table cell; pipes are escaped and empty text shows the placeholder.
pub fn md_cell(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        trimmed.replace('|', "\\|").replace('\n', " ")
    }
}

pub fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        value
    }
}
