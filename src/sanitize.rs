/// Replaces characters that Windows, macOS or Linux refuse in file names.
pub(crate) fn sanitize_filename(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push('\''),
            '|' | '/' | '\\' => out.push('-'),
            ':' | '?' | '*' => {}
            '<' => out.push('['),
            '>' => out.push(']'),
            _ => out.push(ch),
        }
    }
    out.trim().to_string()
}
