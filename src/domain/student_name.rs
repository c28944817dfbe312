use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGHT: usize = 256;
const FORBIDDEN_CHARS: [char; 9] = ['/', '{', '}', '"', '>', '<', '\\', '(', ')'];

/// Display name of a student, built from the record's first and last name.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentName {
    first_name: String,
    last_name: String,
}

impl StudentName {
    pub fn parse(first_name: String, last_name: String) -> Result<StudentName, String> {
        let first_name = parse_component(first_name, "first name")?;
        let last_name = parse_component(last_name, "last name")?;

        Ok(Self {
            first_name,
            last_name,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn parse_component(value: String, label: &str) -> Result<String, String> {
    let value = value.trim().to_string();
    let is_empty = value.is_empty();
    let is_too_long = value.graphemes(true).count() > MAX_CHAR_LENGHT;
    let contains_forbidden_chars = value.chars().any(|char| FORBIDDEN_CHARS.contains(&char));

    if is_empty || is_too_long || contains_forbidden_chars {
        return Err(format!("{} is not a valid student {}", value, label));
    }

    Ok(value)
}

impl std::fmt::Display for StudentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}
