use crate::error::{DescriptorError, Result};

/// Expand `{name}` and `{version}` placeholders in a source URL template.
///
/// Any other `{...}` placeholder is an error so typos cannot slip into a
/// request URL.
pub fn expand_url_template(template: &str, name: &str, version: &str) -> Result<String> {
    let mut out = String::with_capacity(template.len() + version.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| DescriptorError::UnterminatedPlaceholder(template.to_string()))?;

        match &after[..close] {
            "name" => out.push_str(name),
            "version" => out.push_str(version),
            other => {
                return Err(DescriptorError::UnknownPlaceholder {
                    template:    template.to_string(),
                    placeholder: other.to_string(),
                });
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
