use console::Style;

pub fn error_prefix() -> String {
    Style::new().for_stderr().red().bold().apply_to("error:").to_string()
}

pub fn backend_name(s: &str) -> String {
    Style::new().cyan().apply_to(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_prefix_reads_error() {
        assert_eq!(console::strip_ansi_codes(&error_prefix()), "error:");
    }

    #[test]
    fn backend_name_keeps_text() {
        assert_eq!(console::strip_ansi_codes(&backend_name("rich")), "rich");
    }
}
