//! Read-only DOM snapshots parsed with `scraper`.
//!
//! The engine never holds a live DOM. Each read takes the page's serialized
//! HTML and answers questions about it: does an element exist, what text does
//! it show, what does a table or a select contain.
//!
//! `scraper::Html` is not `Send`, so snapshots must be dropped before the
//! next `.await`.

use scraper::{ElementRef, Html, Selector};

use crate::page::Locator;

/// A parsed page.
pub struct Snapshot {
    html: Html,
}

/// A `<select>` as rendered: option values in order and the selected index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

impl SelectControl {
    /// The value a form submission would carry.
    pub fn value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// Index of the first option matching `wanted`, see [`match_option`].
    pub fn position(&self, wanted: &str) -> Option<usize> {
        match_option(&self.options, wanted)
    }
}

/// A table's header texts and the cell texts of each following row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Visible text of an element with whitespace runs collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl Snapshot {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Resolve a locator the way the browser-side command runner does.
    pub fn find(&self, locator: &Locator) -> Option<ElementRef<'_>> {
        match locator {
            Locator::Id { id } => self
                .html
                .select(&selector("[id]"))
                .find(|el| el.value().id() == Some(id.as_str())),
            Locator::Css { selector: css } => {
                let sel = Selector::parse(css).ok()?;
                self.html.select(&sel).next()
            }
            Locator::Nth { tag, index } => {
                let sel = Selector::parse(tag).ok()?;
                self.html.select(&sel).nth(*index)
            }
        }
    }

    pub fn exists(&self, id: &str) -> bool {
        self.find(&Locator::id(id)).is_some()
    }

    /// Trimmed text of the element with this ID, empty when absent.
    pub fn text(&self, id: &str) -> String {
        self.find(&Locator::id(id))
            .map(element_text)
            .unwrap_or_default()
    }

    /// Like [`Snapshot::text`] but `None` when the element is missing.
    pub fn text_opt(&self, id: &str) -> Option<String> {
        self.find(&Locator::id(id)).map(element_text)
    }

    pub fn body_text(&self) -> String {
        self.html
            .select(&selector("body"))
            .next()
            .map(element_text)
            .unwrap_or_default()
    }

    /// Number of elements with this tag name.
    pub fn count(&self, tag: &str) -> usize {
        Selector::parse(tag)
            .map(|sel| self.html.select(&sel).count())
            .unwrap_or(0)
    }

    pub fn select(&self, locator: &Locator) -> Option<SelectControl> {
        let el = self.find(locator)?;
        if el.value().name() != "select" {
            return None;
        }
        let mut options = Vec::new();
        let mut selected = None;
        for (i, opt) in el.select(&selector("option")).enumerate() {
            let value = opt
                .value()
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| element_text(opt));
            // Browsers honor the last `selected` option in a single select.
            if opt.value().attr("selected").is_some() {
                selected = Some(i);
            }
            options.push(value);
        }
        if selected.is_none() && !options.is_empty() {
            selected = Some(0);
        }
        Some(SelectControl { options, selected })
    }

    /// Read a table: the first row gives the headers (`th`, or `td` when the
    /// grid renders none), every later row its `td` cells.
    pub fn table(&self, id: &str) -> Option<HtmlTable> {
        let table = self.find(&Locator::id(id))?;
        let (tr, th, td) = (selector("tr"), selector("th"), selector("td"));
        let mut rows = table.select(&tr);
        let Some(first) = rows.next() else {
            return Some(HtmlTable::default());
        };

        let mut headers: Vec<String> = first.select(&th).map(element_text).collect();
        if headers.is_empty() {
            headers = first.select(&td).map(element_text).collect();
        }

        let rows = rows
            .map(|row| row.select(&td).map(element_text).collect())
            .collect();

        Some(HtmlTable { headers, rows })
    }
}

/// Pick the option for `wanted`: the first option whose value equals it
/// exactly, its integer form without leading zeros, or its two-digit
/// zero-padded form.
pub fn match_option(options: &[String], wanted: &str) -> Option<usize> {
    let normalized = wanted.trim().parse::<i64>().ok().map(|n| n.to_string());
    let padded = if wanted.len() < 2 {
        format!("0{wanted}")
    } else {
        wanted.to_string()
    };

    options.iter().position(|opt| {
        opt == wanted || normalized.as_deref() == Some(opt.as_str()) || *opt == padded
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_match_option_exact() {
        let options = opts(&["--", "01", "02", "15"]);
        assert_eq!(match_option(&options, "15"), Some(3));
    }

    #[test]
    fn test_match_option_unpadded() {
        // Portal lists days without leading zeros.
        let options = opts(&["Day", "1", "2", "3", "8"]);
        assert_eq!(match_option(&options, "08"), Some(4));
        assert_eq!(match_option(&options, "03"), Some(3));
    }

    #[test]
    fn test_match_option_padded() {
        let options = opts(&["MM", "01", "02", "09"]);
        assert_eq!(match_option(&options, "9"), Some(3));
    }

    #[test]
    fn test_match_option_first_wins() {
        // "5" matches the second option exactly, "05" the third by padding.
        let options = opts(&["x", "5", "05"]);
        assert_eq!(match_option(&options, "5"), Some(1));
        assert_eq!(match_option(&options, "05"), Some(1));
    }

    #[test]
    fn test_match_option_non_numeric() {
        let options = opts(&["--Select--", "'TE'", "'PR'"]);
        assert_eq!(match_option(&options, "'PR'"), Some(2));
        assert_eq!(match_option(&options, "TE"), None);
    }

    #[test]
    fn test_every_dob_form_matches() {
        let unpadded: Vec<String> = (0..=31).map(|d| d.to_string()).collect();
        let padded: Vec<String> = (0..=31).map(|d| format!("{d:02}")).collect();
        for day in 1..=31 {
            for input in [day.to_string(), format!("{day:02}")] {
                assert_eq!(match_option(&unpadded, &input), Some(day), "{input}");
                assert_eq!(match_option(&padded, &input), Some(day), "{input}");
            }
        }
    }

    #[test]
    fn test_snapshot_text_and_exists() {
        let snap = Snapshot::parse(
            r#"<html><body><span id="lblname">  Asha
                Verma </span><span id="empty"></span></body></html>"#,
        );
        assert!(snap.exists("lblname"));
        assert!(!snap.exists("lblmissing"));
        assert_eq!(snap.text("lblname"), "Asha Verma");
        assert_eq!(snap.text("empty"), "");
        assert_eq!(snap.text_opt("nope"), None);
    }

    #[test]
    fn test_snapshot_select_state() {
        let snap = Snapshot::parse(
            r#"<select id="ddl"><option value="a">A</option>
               <option selected="selected" value="b">B</option><option>C</option></select>"#,
        );
        let control = snap.select(&Locator::id("ddl")).unwrap();
        assert_eq!(control.options, ["a", "b", "C"]);
        assert_eq!(control.value(), Some("b"));

        let plain = Snapshot::parse(r#"<select id="s"><option value="x"></option></select>"#);
        assert_eq!(plain.select(&Locator::id("s")).unwrap().value(), Some("x"));
    }

    #[test]
    fn test_snapshot_nth_and_count() {
        let snap = Snapshot::parse(
            "<select id=a></select><select id=b></select><select id=c></select>",
        );
        assert_eq!(snap.count("select"), 3);
        let el = snap.find(&Locator::nth("select", 1)).unwrap();
        assert_eq!(el.value().id(), Some("b"));
        assert!(snap.find(&Locator::nth("select", 3)).is_none());
    }

    #[test]
    fn test_snapshot_table() {
        let snap = Snapshot::parse(
            r#"<table id="gvshow">
                 <tr><th>Month</th><th> Paper Name </th></tr>
                 <tr><td>JAN</td><td>Physics</td></tr>
                 <tr><td>FEB</td></tr>
               </table>"#,
        );
        let table = snap.table("gvshow").unwrap();
        assert_eq!(table.headers, ["Month", "Paper Name"]);
        assert_eq!(table.rows, vec![vec!["JAN", "Physics"], vec!["FEB"]]);
    }

    #[test]
    fn test_snapshot_table_td_headers() {
        let snap = Snapshot::parse(
            r#"<table id="t"><tr><td>Name</td><td>Email</td></tr>
               <tr><td>R. Gupta</td><td>r@x.in</td></tr></table>"#,
        );
        let table = snap.table("t").unwrap();
        assert_eq!(table.headers, ["Name", "Email"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_snapshot_table_edges() {
        let snap = Snapshot::parse(
            r#"<table id="empty"></table>
               <table id="head"><tr><th>Only</th></tr></table>"#,
        );
        assert_eq!(snap.table("empty"), Some(HtmlTable::default()));
        let head = snap.table("head").unwrap();
        assert_eq!(head.headers, ["Only"]);
        assert!(head.rows.is_empty());
        assert!(snap.table("absent").is_none());
    }
}
