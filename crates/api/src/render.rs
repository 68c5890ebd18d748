use std::fmt::Write;

use projector::{cell_text, Table};
use umls::RelationType;

use crate::shell::{HierarchyPanel, SearchInputs, SearchOutcome};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 64rem; padding: 0 1rem; }
form { display: grid; gap: 0.75rem; max-width: 32rem; margin-bottom: 1.5rem; }
label { display: grid; gap: 0.25rem; }
input, select, button { font: inherit; padding: 0.4rem; }
table { border-collapse: collapse; margin: 0.5rem 0 1.5rem; width: 100%; }
th, td { border: 1px solid #d0d7de; padding: 0.3rem 0.5rem; text-align: left; vertical-align: top; }
th { background: #f6f8fa; }
.banner { border-radius: 0.3rem; padding: 0.6rem 0.8rem; margin: 0.75rem 0; }
.warning { background: #fff8c5; }
.error { background: #ffebe9; }
.info { background: #ddf4ff; }
"#;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The whole page: form, then the outcome of the last trigger if any.
pub fn page(inputs: &SearchInputs, outcome: Option<&SearchOutcome>, key_configured: bool) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>UMLS API</title>\n");
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n<h1>UMLS API</h1>\n");

    form(&mut html, inputs, key_configured);

    if let Some(outcome) = outcome {
        render_outcome(&mut html, outcome);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn form(html: &mut String, inputs: &SearchInputs, key_configured: bool) {
    html.push_str("<form method=\"post\" action=\"/search\">\n");

    let placeholder = if key_configured {
        "Leave blank to use the configured key"
    } else {
        ""
    };
    let _ = writeln!(
        html,
        "<label>Enter your API Key<input type=\"password\" name=\"api_key\" autocomplete=\"off\" placeholder=\"{}\"></label>",
        placeholder
    );
    let _ = writeln!(
        html,
        "<label>Enter your search term<input type=\"text\" name=\"term\" value=\"{}\"></label>",
        escape(&inputs.term)
    );

    html.push_str("<label>Select the relation type<select name=\"relation_type\">\n");
    for relation in RelationType::ALL {
        let selected = if relation == inputs.relation_type { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{0}\"{1}>{0}</option>", relation, selected);
    }
    html.push_str("</select></label>\n");

    html.push_str("<button type=\"submit\">Search</button>\n</form>\n");
}

fn render_outcome(html: &mut String, outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::Warning { message } => banner(html, "warning", message),
        SearchOutcome::Error { message, results } => {
            if let Some(results) = results {
                table(html, results);
            }
            banner(html, "error", message);
        }
        SearchOutcome::Found {
            cui,
            relation_type,
            results,
            hierarchy,
        } => {
            table(html, results);
            let _ = writeln!(
                html,
                "<h2>{} of {}</h2>",
                escape(relation_type.as_str()),
                escape(cui)
            );
            match hierarchy {
                HierarchyPanel::Table { table: rows } => table(html, rows),
                HierarchyPanel::Info { message } => banner(html, "info", message),
            }
        }
    }
}

fn banner(html: &mut String, kind: &str, message: &str) {
    let _ = writeln!(html, "<div class=\"banner {}\">{}</div>", kind, escape(message));
}

fn table(html: &mut String, table: &Table) {
    html.push_str("<table>\n<thead><tr>");
    for column in table.columns() {
        let _ = write!(html, "<th>{}</th>", escape(column));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in table.rows() {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(&cell_text(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}
