use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

/// Build the URL of one listing page by appending `page=<index>` to the base URL
pub fn page_url(base: &Url, index: u32) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("page", &index.to_string());
    url
}

/// A single cell reference such as `B3` (column and row both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub column: u32,
    pub row: u32,
}

impl CellRef {
    /// Parse an A1-style reference; `$` markers are tolerated
    pub fn parse(text: &str) -> Option<Self> {
        static CELL: OnceLock<Regex> = OnceLock::new();
        let re = CELL.get_or_init(|| {
            Regex::new(r"^\$?([A-Za-z]{1,3})\$?([1-9][0-9]{0,6})$").expect("cell pattern is valid")
        });

        let caps = re.captures(text.trim())?;
        let column = column_index(caps.get(1)?.as_str())?;
        let row: u32 = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { column, row })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

/// A rectangular block of cells, `A1:B4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Parse `A1:B4` or a single cell `A1`.
    ///
    /// The end cell must not lie above or left of the start cell.
    pub fn parse(text: &str) -> Option<Self> {
        let (start, end) = match text.split_once(':') {
            Some((a, b)) => (CellRef::parse(a)?, CellRef::parse(b)?),
            None => {
                let cell = CellRef::parse(text)?;
                (cell, cell)
            }
        };
        if end.column < start.column || end.row < start.row {
            return None;
        }
        Some(Self { start, end })
    }

    /// Whether the range covers more than one cell
    pub fn is_multi_cell(&self) -> bool {
        self.start != self.end
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// `A` → 1, `Z` → 26, `AA` → 27
fn column_index(letters: &str) -> Option<u32> {
    let mut index: u32 = 0;
    for ch in letters.chars() {
        let digit = ch.to_ascii_uppercase() as u32;
        if !(('A' as u32)..=('Z' as u32)).contains(&digit) {
            return None;
        }
        index = index * 26 + (digit - 'A' as u32 + 1);
    }
    // Excel stops at XFD
    if index == 0 || index > 16_384 {
        return None;
    }
    Some(index)
}

fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_appends_to_existing_query() {
        let base = Url::parse("https://example.com/alerts?kind=1&year=1").unwrap();
        assert_eq!(
            page_url(&base, 0).as_str(),
            "https://example.com/alerts?kind=1&year=1&page=0"
        );
        assert_eq!(
            page_url(&base, 3).as_str(),
            "https://example.com/alerts?kind=1&year=1&page=3"
        );
    }

    #[test]
    fn page_url_starts_query_when_missing() {
        let base = Url::parse("https://example.com/alerts").unwrap();
        assert_eq!(page_url(&base, 1).as_str(), "https://example.com/alerts?page=1");
    }

    #[test]
    fn parses_cell_references() {
        assert_eq!(CellRef::parse("A1"), Some(CellRef { column: 1, row: 1 }));
        assert_eq!(CellRef::parse("$AB$12"), Some(CellRef { column: 28, row: 12 }));
        assert_eq!(CellRef::parse("b3").map(|c| c.to_string()), Some("B3".to_string()));
        assert_eq!(CellRef::parse("A0"), None);
        assert_eq!(CellRef::parse("1A"), None);
        assert_eq!(CellRef::parse("ZZZZ1"), None);
    }

    #[test]
    fn parses_ranges() {
        let range = CellRange::parse("A1:B4").unwrap();
        assert_eq!(range.start.to_string(), "A1");
        assert_eq!(range.end.to_string(), "B4");
        assert!(range.is_multi_cell());

        let single = CellRange::parse("C2").unwrap();
        assert!(!single.is_multi_cell());
        assert_eq!(single.to_string(), "C2:C2");

        assert_eq!(CellRange::parse("B4:A1"), None);
        assert_eq!(CellRange::parse("A1:"), None);
    }

    #[test]
    fn column_letters_round_trip_edges() {
        for (index, letters) in [(1, "A"), (26, "Z"), (27, "AA"), (702, "ZZ"), (703, "AAA")] {
            assert_eq!(column_letters(index), letters);
            assert_eq!(column_index(letters), Some(index));
        }
    }
}
