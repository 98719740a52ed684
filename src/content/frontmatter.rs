//! Front-matter splitting
//!
//! A content file starts with a delimited metadata block followed by the
//! body. `---` fences a YAML block, `+++` fences a TOML block. Turning the
//! block into typed fields is the job of [`super::schema`].

use super::ContentError;

/// Syntax of a front-matter block, picked by its delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
}

impl FrontMatterFormat {
    fn from_delimiter(line: &str) -> Option<Self> {
        match line {
            "---" => Some(FrontMatterFormat::Yaml),
            "+++" => Some(FrontMatterFormat::Toml),
            _ => None,
        }
    }

    pub fn delimiter(self) -> &'static str {
        match self {
            FrontMatterFormat::Yaml => "---",
            FrontMatterFormat::Toml => "+++",
        }
    }
}

/// The unparsed metadata block of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrontMatter<'a> {
    pub format: FrontMatterFormat,
    /// Text between the delimiters
    pub text: &'a str,
    /// 1-based line of the source file on which `text` starts
    pub first_line: usize,
}

/// Split file content into its front-matter block and the remaining body.
///
/// Leading blank lines of the body are dropped. A UTF-8 byte order mark
/// before the opening delimiter is tolerated.
pub fn split(content: &str) -> Result<(RawFrontMatter<'_>, &str), ContentError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let opening = lines.next().ok_or(ContentError::MissingFrontmatter)?;
    let format = FrontMatterFormat::from_delimiter(opening.trim_end())
        .ok_or(ContentError::MissingFrontmatter)?;

    let start = opening.len();
    let mut offset = start;

    for line in lines {
        if line.trim_end() == format.delimiter() {
            let text = &content[start..offset];
            let body = content[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok((
                RawFrontMatter {
                    format,
                    text,
                    first_line: 2,
                },
                body,
            ));
        }
        offset += line.len();
    }

    Err(ContentError::MalformedFrontmatter {
        message: format!("unterminated block: no closing `{}` line", format.delimiter()),
        line: Some(1),
        column: Some(1),
    })
}
