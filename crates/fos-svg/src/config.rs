//! Serialization configuration

/// Settings an element hands to every live value it creates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Fractional digits written for numbers (None = shortest round-trip form)
    pub precision: Option<u8>,

    /// Separator between the two coordinates of a point
    pub coordinate_separator: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: None,
            coordinate_separator: ',',
        }
    }
}

impl Config {
    /// Append a number in canonical attribute form
    pub fn write_number(&self, out: &mut String, value: f32) {
        if value == 0.0 {
            // Covers -0 as well
            out.push('0');
            return;
        }
        match self.precision {
            None => {
                out.push_str(&format!("{}", value));
            }
            Some(digits) => {
                let start = out.len();
                out.push_str(&format!("{:.*}", digits as usize, value));
                if out[start..].contains('.') {
                    let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
                    out.truncate(trimmed);
                }
                if &out[start..] == "-0" {
                    out.truncate(start);
                    out.push('0');
                }
            }
        }
    }

    pub fn format_number(&self, value: f32) -> String {
        let mut out = String::new();
        self.write_number(&mut out, value);
        out
    }
}
