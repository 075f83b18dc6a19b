//! Printable HTML document: a summary block and one table per group.
//!
//! The document is self-contained (inline CSS) and asks the browser to print on load.

use crate::core::{block_date_span, block_totals, group_totals, report_totals, Group, Report};
use crate::utils::format_usd;
use std::fmt::Write;

pub fn render(report: &Report) -> String {
    let totals = report_totals(report);
    let mut groups_html = String::new();
    for group in &report.groups {
        render_group(&mut groups_html, group);
    }
    if report.groups.is_empty() {
        groups_html.push_str(r#"<p class="empty">No data found.</p>"#);
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Group Allotment Report</title>
    <style>
{css}
    </style>
</head>
<body onload="window.print()">
    <h1>Group Allotment Report</h1>
    <p class="range">{date_range}</p>
    <section class="summary">
        <div class="card"><h3>Total Groups</h3><p>{total_groups}</p></div>
        <div class="card"><h3>Allotment Blocks</h3><p>{total_blocks}</p></div>
        <div class="card"><h3>Pickup</h3><p>{pickup}% ({confirmed}/{allotted})</p></div>
        <div class="card"><h3>Actual Revenue</h3><p>{actual}</p></div>
        <div class="card"><h3>Forecasted Revenue</h3><p>{forecasted}</p></div>
    </section>
{groups_html}
</body>
</html>"##,
        css = CSS,
        date_range = escape(&report.date_range.display()),
        total_groups = totals.groups,
        total_blocks = totals.blocks,
        pickup = totals.totals.pickup,
        confirmed = totals.totals.total_confirmed,
        allotted = totals.totals.total_allotted,
        actual = format_usd(totals.totals.actual_revenue),
        forecasted = format_usd(totals.totals.forecasted_revenue),
        groups_html = groups_html,
    )
}

fn render_group(out: &mut String, group: &Group) {
    let totals = group_totals(group);
    let _ = write!(
        out,
        r#"    <section class="group">
        <h2>{title}</h2>
        <p class="group-meta">{blocks} blocks &bull; {pickup}% pickup &bull; {actual} actual &bull; {forecasted} forecasted</p>
        <table>
            <thead>
                <tr><th>Block Name</th><th>Code</th><th>Status</th><th>Start Date</th><th>End Date</th><th class="num">Pickup</th><th class="num">Revenue</th><th class="num">Forecasted Revenue</th></tr>
            </thead>
            <tbody>
"#,
        title = escape(&group.title()),
        blocks = group.allotment_blocks.len(),
        pickup = totals.pickup,
        actual = format_usd(totals.actual_revenue),
        forecasted = format_usd(totals.forecasted_revenue),
    );

    for block in &group.allotment_blocks {
        let totals = block_totals(block);
        let span = block_date_span(block);
        let _ = writeln!(
            out,
            r#"                <tr><td>{name}</td><td>{code}</td><td>{status}</td><td>{start}</td><td>{end}</td><td class="num">{pickup}% ({confirmed}/{allotted})</td><td class="num">{actual}</td><td class="num">{forecasted}</td></tr>"#,
            name = escape(&block.name),
            code = escape(block.code().unwrap_or("-")),
            status = escape(block.status.as_deref().unwrap_or("-")),
            start = escape(&span.start),
            end = escape(&span.end),
            pickup = totals.pickup,
            confirmed = totals.total_confirmed,
            allotted = totals.total_allotted,
            actual = format_usd(totals.actual_revenue),
            forecasted = format_usd(totals.forecasted_revenue),
        );
    }

    out.push_str("            </tbody>\n        </table>\n    </section>\n");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
    color: #1a202c;
    padding: 24px;
    font-size: 12px;
}

h1 {
    font-size: 22px;
    margin-bottom: 4px;
}

.range {
    color: #718096;
    margin-bottom: 16px;
}

.summary {
    display: flex;
    gap: 12px;
    margin-bottom: 24px;
}

.card {
    flex: 1;
    border: 1px solid #e2e8f0;
    border-radius: 6px;
    padding: 10px;
}

.card h3 {
    font-size: 11px;
    color: #718096;
    text-transform: uppercase;
}

.card p {
    font-size: 16px;
    font-weight: 600;
}

.group {
    margin-bottom: 24px;
    page-break-inside: avoid;
}

.group h2 {
    font-size: 15px;
}

.group-meta {
    color: #4a5568;
    margin-bottom: 8px;
}

table {
    width: 100%;
    border-collapse: collapse;
}

th, td {
    border: 1px solid #cbd5e0;
    padding: 4px 6px;
    text-align: left;
}

th {
    background: #f7fafc;
}

.num {
    text-align: right;
}

.empty {
    color: #718096;
    text-align: center;
    padding: 40px;
}

@media print {
    body {
        padding: 0;
    }
}
"#;
