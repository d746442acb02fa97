use console::style;
use famopt_contracts::analysis::{Impact, OptimizationResult};

pub const STATUS_OVER_MODELED: &str = "Over-Modeled";
pub const STATUS_OPTIMIZED: &str = "Optimized";
pub const NO_SUGGESTIONS: &str = "No optimization suggestions returned.";
pub const NO_SYMBOLIC_CANDIDATES: &str = "No obvious candidates detected.";
pub const NO_UNUSED_PARAMS: &str = "No suspicious parameters flagged.";

const HIGH_COMPLEXITY_THRESHOLD: f64 = 70.0;
const GAUGE_CELLS: usize = 20;

const REPORT_STYLE: &str = r#"
    body { font-family: Arial, sans-serif; background: #1e1e1e; color: #ddd; margin: 0; padding: 24px; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); gap: 16px; }
    .panel { background: #252526; border-radius: 8px; padding: 16px; border-left: 4px solid #0078d4; }
    .panel.ok { border-left-color: #107c10; }
    .panel.warn { border-left-color: #d83b01; }
    .label { font-size: 12px; text-transform: uppercase; color: #999; }
    .value { font-size: 24px; font-weight: bold; }
    .gauge { display: flex; height: 12px; border-radius: 6px; overflow: hidden; margin-top: 8px; }
    .card { background: #2d2d30; border-left: 2px solid #0078d4; padding: 12px; margin: 8px 0; }
    .card-head { display: flex; justify-content: space-between; }
    .card h4 { margin: 0; }
    .kind { font-size: 11px; color: #999; }
    .badge { font-size: 12px; padding: 2px 8px; border-radius: 4px; font-family: monospace; }
    .impact-high { background: #7f1d1d; color: #fecaca; }
    .impact-medium { background: #713f12; color: #fef08a; }
    .impact-low { background: #14532d; color: #bbf7d0; }
    .tag { display: inline-block; padding: 2px 10px; margin: 2px; border: 1px solid #555; border-radius: 12px; font-size: 12px; }
    .empty { color: #888; font-style: italic; }
    .lod { white-space: pre-line; }
    footer { margin-top: 24px; font-size: 12px; color: #777; }
"#;

/// A report list, or the placeholder shown when the model returned none.
#[derive(Debug, Clone, PartialEq)]
pub enum ListSection<T = String> {
    Items(Vec<T>),
    Empty(&'static str),
}

impl<T> ListSection<T> {
    fn from_items(items: Vec<T>, placeholder: &'static str) -> Self {
        if items.is_empty() {
            ListSection::Empty(placeholder)
        } else {
            ListSection::Items(items)
        }
    }
}

/// Two-slice split of the complexity gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSplit {
    pub complexity: f64,
    pub remainder: f64,
    pub high: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionCard {
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub badge: String,
    pub kind: String,
}

/// Presentation model for one report; every output format renders from this.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub over_modeled: bool,
    pub status: &'static str,
    pub score: String,
    pub gauge: GaugeSplit,
    pub polygon_estimate: String,
    pub suggestions: ListSection<SuggestionCard>,
    pub symbolic_candidates: ListSection,
    pub unused_params: ListSection,
    pub lod_recommendations: String,
    pub overall_analysis: String,
}

impl ReportView {
    pub fn from_result(result: &OptimizationResult) -> Self {
        let cards = result
            .suggestions
            .iter()
            .map(|suggestion| SuggestionCard {
                title: suggestion.title.clone(),
                description: suggestion.description.clone(),
                impact: suggestion.impact,
                badge: format!("{} Impact", suggestion.impact),
                kind: suggestion.kind.to_string(),
            })
            .collect();
        let score = result.complexity_score;
        Self {
            over_modeled: result.is_over_modeled,
            status: if result.is_over_modeled {
                STATUS_OVER_MODELED
            } else {
                STATUS_OPTIMIZED
            },
            score: score.to_string(),
            gauge: GaugeSplit {
                complexity: score,
                remainder: 100.0 - score,
                high: score > HIGH_COMPLEXITY_THRESHOLD,
            },
            polygon_estimate: result.polygon_estimate.clone(),
            suggestions: ListSection::from_items(cards, NO_SUGGESTIONS),
            symbolic_candidates: ListSection::from_items(
                result.symbolic_candidates.clone(),
                NO_SYMBOLIC_CANDIDATES,
            ),
            unused_params: ListSection::from_items(
                result.unused_params.clone(),
                NO_UNUSED_PARAMS,
            ),
            lod_recommendations: result.lod_recommendations.clone(),
            overall_analysis: result.overall_analysis.clone(),
        }
    }
}

fn gauge_bar(gauge: GaugeSplit) -> (String, String) {
    let ratio = (gauge.complexity / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * GAUGE_CELLS as f64).round() as usize;
    (
        "█".repeat(filled),
        "░".repeat(GAUGE_CELLS.saturating_sub(filled)),
    )
}

pub fn render_text(view: &ReportView, color: bool) -> String {
    let mut out = String::new();
    let heading = |text: &str| style(text.to_string()).bold().force_styling(color).to_string();

    out.push_str(&heading("Optimization Report"));
    out.push_str("\n\n");

    let status = if view.over_modeled {
        style(view.status).red().bold()
    } else {
        style(view.status).green().bold()
    };
    out.push_str(&format!("Status:          {}\n", status.force_styling(color)));
    out.push_str(&format!("Polygon Est.:    {}\n", view.polygon_estimate));
    let (filled, empty) = gauge_bar(view.gauge);
    let filled = if view.gauge.high {
        style(filled).red()
    } else {
        style(filled).blue()
    };
    out.push_str(&format!(
        "Complexity:      {}/100 {}{}\n\n",
        view.score,
        filled.force_styling(color),
        style(empty).dim().force_styling(color)
    ));

    out.push_str(&heading("AI Analysis"));
    out.push('\n');
    out.push_str(&view.overall_analysis);
    out.push_str("\n\n");

    out.push_str(&heading("Optimization Opportunities"));
    out.push('\n');
    match &view.suggestions {
        ListSection::Empty(placeholder) => {
            out.push_str(&format!("  {placeholder}\n"));
        }
        ListSection::Items(cards) => {
            for card in cards {
                let badge = match card.impact {
                    Impact::High => style(format!("[{}]", card.badge)).red(),
                    Impact::Medium => style(format!("[{}]", card.badge)).yellow(),
                    Impact::Low => style(format!("[{}]", card.badge)).green(),
                };
                out.push_str(&format!(
                    "  - {} {} ({})\n    {}\n",
                    style(&card.title).bold().force_styling(color),
                    badge.force_styling(color),
                    card.kind,
                    card.description
                ));
            }
        }
    }
    out.push('\n');

    out.push_str(&heading("Solid to Symbolic (Rec. for Plan View)"));
    out.push('\n');
    match &view.symbolic_candidates {
        ListSection::Items(items) => {
            for item in items {
                out.push_str(&format!("  • {item}\n"));
            }
        }
        ListSection::Empty(placeholder) => out.push_str(&format!("  {placeholder}\n")),
    }
    out.push('\n');

    out.push_str(&heading("Potential Unused Parameters"));
    out.push('\n');
    match &view.unused_params {
        ListSection::Items(items) => {
            let tags: Vec<String> = items.iter().map(|item| format!("[{item}]")).collect();
            out.push_str(&format!("  {}\n", tags.join(" ")));
        }
        ListSection::Empty(placeholder) => out.push_str(&format!("  {placeholder}\n")),
    }
    out.push_str("  *Inferred from category standards and visual inspection. Verify in Revit.\n\n");

    out.push_str(&heading("LOD Strategy"));
    out.push('\n');
    out.push_str(&view.lod_recommendations);
    out.push('\n');
    out
}

pub fn render_html(view: &ReportView, generated_at: &str) -> String {
    let status_class = if view.over_modeled { "warn" } else { "ok" };
    let gauge_color = if view.gauge.high { "#d83b01" } else { "#0078d4" };
    let complexity_pct = view.gauge.complexity.clamp(0.0, 100.0);
    let remainder_pct = 100.0 - complexity_pct;

    let suggestions = match &view.suggestions {
        ListSection::Empty(placeholder) => {
            format!("<p class='empty'>{}</p>", escape_html(placeholder))
        }
        ListSection::Items(cards) => cards
            .iter()
            .map(|card| {
                format!(
                    "<div class='card'><div class='card-head'><h4>{title}</h4>\
                     <span class='badge impact-{impact}'>{badge}</span></div>\
                     <div class='kind'>{kind}</div><p>{description}</p></div>",
                    title = escape_html(&card.title),
                    impact = card.impact.as_str().to_ascii_lowercase(),
                    badge = escape_html(&card.badge),
                    kind = escape_html(&card.kind),
                    description = escape_html(&card.description),
                )
            })
            .collect::<String>(),
    };
    let symbolic = match &view.symbolic_candidates {
        ListSection::Items(items) => format!(
            "<ul>{}</ul>",
            items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect::<String>()
        ),
        ListSection::Empty(placeholder) => {
            format!("<p class='empty'>{}</p>", escape_html(placeholder))
        }
    };
    let params = match &view.unused_params {
        ListSection::Items(items) => format!(
            "<div class='tags'>{}</div>",
            items
                .iter()
                .map(|item| format!("<span class='tag'>{}</span>", escape_html(item)))
                .collect::<String>()
        ),
        ListSection::Empty(placeholder) => {
            format!("<p class='empty'>{}</p>", escape_html(placeholder))
        }
    };

    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset='utf-8'>
  <title>Family Optimization Report</title>
  <style>{style}  </style>
</head>
<body>
  <h1>Optimization Report</h1>
  <div class='grid'>
    <div class='panel {status_class}'>
      <div class='label'>Status</div><div class='value'>{status}</div>
    </div>
    <div class='panel'>
      <div class='label'>Polygon Est.</div><div class='value'>{polygon}</div>
    </div>
    <div class='panel'>
      <div class='label'>Complexity Score</div>
      <div class='value'>{score}<small>/100</small></div>
      <div class='gauge'>
        <div style='width: {complexity_pct}%; background: {gauge_color};'></div>
        <div style='width: {remainder_pct}%; background: #2d2d30;'></div>
      </div>
    </div>
  </div>
  <div class='grid'>
    <div class='panel'><h3>AI Analysis</h3><p>{analysis}</p></div>
    <div class='panel'><h3>Optimization Opportunities</h3>{suggestions}</div>
    <div class='panel'><h3>Solid to Symbolic</h3>{symbolic}</div>
    <div class='panel'>
      <h3>Potential Unused Parameters</h3>
      <p class='label'>Inferred from category standards and visual inspection. Verify in Revit.</p>
      {params}
    </div>
    <div class='panel'><h3>LOD Strategy</h3><div class='lod'>{lod}</div></div>
  </div>
  <footer>Generated {generated_at}. AI analysis may vary; always verify changes in Revit.</footer>
</body>
</html>
"#,
        style = REPORT_STYLE,
        status = escape_html(view.status),
        polygon = escape_html(&view.polygon_estimate),
        score = escape_html(&view.score),
        analysis = escape_html(&view.overall_analysis),
        lod = escape_html(&view.lod_recommendations),
        generated_at = escape_html(generated_at),
    )
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}
