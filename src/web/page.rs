// HTML rendering for the keeper-analysis table. The page carries its own
// sort/filter/search script so every interaction happens client-side on the
// already-rendered dataset.

use std::fmt::Write;

use crate::analysis::KeeperAnalysisRow;

/// Escape text for safe embedding in HTML bodies and attributes.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt_cell<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// Numeric sort key for a cell; rows without a value sort last.
fn sort_key<T: Copy + Into<i64>>(value: Option<T>) -> String {
    match value {
        Some(v) => v.into().to_string(),
        None => "999999".to_string(),
    }
}

const STYLE: &str = "\
body { font-family: -apple-system, 'Segoe UI', sans-serif; margin: 2rem; color: #222; }
h1 { font-size: 1.4rem; }
.controls { margin: 1rem 0; display: flex; gap: 1rem; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { border: 1px solid #ccc; padding: 0.35rem 0.5rem; text-align: left; }
th { background: #2c5f2d; color: #fff; cursor: pointer; user-select: none; white-space: nowrap; }
tr:nth-child(even) { background: #f4f4f4; }
tr.valuable { background: #e7f6e7; }
.muted { color: #888; }
";

const SCRIPT: &str = r#"
function applyFilters() {
  var manager = document.getElementById('manager-filter').value.toLowerCase();
  var search = document.getElementById('search').value.toLowerCase();
  var rows = document.querySelectorAll('#analysis tbody tr');
  rows.forEach(function (row) {
    var okManager = !manager || row.dataset.manager.toLowerCase() === manager;
    var okSearch = !search || row.dataset.player.toLowerCase().indexOf(search) !== -1;
    row.style.display = okManager && okSearch ? '' : 'none';
  });
}

var sortState = { col: -1, asc: true };
function sortBy(col, numeric) {
  var tbody = document.querySelector('#analysis tbody');
  var rows = Array.prototype.slice.call(tbody.rows);
  sortState.asc = sortState.col === col ? !sortState.asc : true;
  sortState.col = col;
  rows.sort(function (a, b) {
    var av = a.cells[col].dataset.sort !== undefined ? a.cells[col].dataset.sort : a.cells[col].textContent;
    var bv = b.cells[col].dataset.sort !== undefined ? b.cells[col].dataset.sort : b.cells[col].textContent;
    var cmp = numeric ? (Number(av) - Number(bv)) : av.localeCompare(bv);
    return sortState.asc ? cmp : -cmp;
  });
  rows.forEach(function (row) { tbody.appendChild(row); });
}
"#;

/// Render the full analysis page. `rows` should already be shaped for
/// display (sorted, excluded positions removed); `managers` feeds the
/// filter dropdown.
pub fn render_analysis_page(
    rows: &[KeeperAnalysisRow],
    managers: &[String],
    league_name: &str,
    season: i32,
) -> String {
    let next = season + 1;
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} — Keeper Analysis</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape(league_name)
    );
    let _ = write!(
        html,
        "<h1>🏈 {} — {season} Draft vs {next} Projections</h1>\n",
        escape(league_name)
    );

    // Controls: manager dropdown + player search.
    html.push_str("<div class=\"controls\">\n<select id=\"manager-filter\" onchange=\"applyFilters()\">\n<option value=\"\">All managers</option>\n");
    for manager in managers {
        let _ = write!(html, "<option>{}</option>\n", escape(manager));
    }
    html.push_str("</select>\n<input id=\"search\" type=\"text\" placeholder=\"Search players…\" oninput=\"applyFilters()\">\n</div>\n");

    // Table header. The second argument to sortBy marks numeric columns.
    html.push_str("<table id=\"analysis\">\n<thead>\n<tr>");
    let headers: &[(&str, bool)] = &[
        ("Player", false),
        ("Manager", false),
        ("Round", true),
        ("Pick", true),
        ("Keeper", false),
        ("Eligible", false),
        ("Rank", true),
        ("Pos", false),
        ("Proj Rd", true),
        ("Keeper Rd", true),
        ("Value", true),
    ];
    for (i, (label, numeric)) in headers.iter().enumerate() {
        let _ = write!(html, "<th onclick=\"sortBy({i}, {numeric})\">{label}</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in rows {
        let classes = if row.valuable { " class=\"valuable\"" } else { "" };
        let _ = write!(
            html,
            "<tr{classes} data-player=\"{player}\" data-manager=\"{manager}\">\
             <td>{player}</td><td>{manager}</td>\
             <td data-sort=\"{round_key}\">{round}</td>\
             <td data-sort=\"{pick_key}\">{pick}</td>\
             <td>{keeper}</td><td>{eligible}</td>\
             <td data-sort=\"{rank_key}\">{rank}</td>\
             <td>{pos}</td>\
             <td data-sort=\"{proj_key}\">{proj}</td>\
             <td data-sort=\"{cost_key}\">{cost}</td>\
             <td data-sort=\"{value_key}\">{value}</td></tr>\n",
            player = escape(&row.player_name),
            manager = escape(&row.manager),
            round_key = sort_key(row.draft_round),
            round = opt_cell(&row.draft_round),
            pick_key = sort_key(row.overall_pick),
            pick = opt_cell(&row.overall_pick),
            keeper = if row.keeper_status { "🔒" } else { "" },
            eligible = if row.keeper_eligible { "✅" } else { "❌" },
            rank_key = sort_key(row.projected_rank),
            rank = opt_cell(&row.projected_rank),
            pos = escape(&opt_cell(&row.position_rank)),
            proj_key = sort_key(row.projected_round),
            proj = opt_cell(&row.projected_round),
            cost_key = sort_key(row.keeper_round),
            cost = opt_cell(&row.keeper_round),
            value_key = sort_key(row.keeper_value),
            value = match row.keeper_value {
                Some(v) if v > 0 => format!("+{v}"),
                Some(v) => v.to_string(),
                None => "-".to_string(),
            },
        );
    }

    html.push_str("</tbody>\n</table>\n");
    let _ = write!(
        html,
        "<p class=\"muted\">{} players · click a column header to sort</p>\n",
        rows.len()
    );
    let _ = write!(html, "<script>{SCRIPT}</script>\n</body>\n</html>\n");
    html
}

/// Render the error page shown when a request cannot be served.
pub fn render_error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Error — Keeper Analysis</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>❌ Something went wrong</h1>\n<p>{}</p>\n</body>\n</html>\n",
        escape(message)
    )
}
