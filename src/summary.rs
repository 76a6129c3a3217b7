//! Weekend summary prose and the top-three podium.

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::warn;

use crate::{
    model::{TopPlayer, WeekendReport},
    table::format::format_number,
};

pub fn rank_medal(rank: &str) -> Option<&'static str> {
    match rank {
        "#1" => Some("🥇"),
        "#2" => Some("🥈"),
        "#3" => Some("🥉"),
        _ => None,
    }
}

pub fn placement_medal(rank: u32) -> Option<&'static str> {
    match rank {
        1 => Some("🥇"),
        2 => Some("🥈"),
        3 => Some("🥉"),
        _ => None,
    }
}

fn rank_with_medal(rank: &str) -> String {
    match rank_medal(rank) {
        Some(medal) => format!("{rank} {medal}"),
        None => rank.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WeekendDate {
    /// A calendar date, shown exactly as the report wrote it.
    Parsed { date: NaiveDate, text: String },
    Raw(String),
}

impl WeekendDate {
    fn parse(text: &str) -> Self {
        match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
            Ok(date) => WeekendDate::Parsed {
                date,
                text: text.to_string(),
            },
            Err(err) => {
                warn!("weekend date {text:?} is not YYYY-MM-DD: {err}");
                WeekendDate::Raw(text.to_string())
            }
        }
    }

    fn html(&self) -> String {
        match self {
            WeekendDate::Parsed { date, text } => format!(
                "<time id=\"weekend-date\" datetime=\"{}\">{}</time>",
                date.format("%Y-%m-%d"),
                encode_text(text)
            ),
            WeekendDate::Raw(text) => {
                format!("<span id=\"weekend-date\">{}</span>", encode_text(text))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub heading: String,
    pub weekend_date: Option<WeekendDate>,
    pub score_sentences: Vec<String>,
    pub rank_sentences: Vec<String>,
}

pub fn build_summary(report: &WeekendReport) -> Summary {
    let recent = format_number(report.team_score_recent);
    let max = format_number(report.team_score_max);

    let mut score_sentences = Vec::new();
    if report.team_score_recent > report.team_score_max {
        score_sentences.push(format!(
            "This weekend's team score of {recent} is a new record 🏆, surpassing our previous high of {max}."
        ));
    } else if report.team_score_recent == report.team_score_max {
        score_sentences.push(format!(
            "This weekend's team score of {recent} ties our previous high of {max}."
        ));
    } else {
        score_sentences.push(format!(
            "This weekend's team score of {recent} did not beat our highest score of {max}."
        ));
    }

    if let Some(previous_score) = report.team_score_previous {
        let previous = format_number(previous_score);
        let diff = report.team_score_recent - previous_score;
        if diff > 0.0 {
            score_sentences.push(format!(
                "We improved from last week's score of {previous} by {} points ⬆️.",
                format_number(diff)
            ));
        } else if diff < 0.0 {
            score_sentences.push(format!(
                "Our score dropped from last week's {previous} by {} points ⬇️.",
                format_number(diff.abs())
            ));
        } else {
            score_sentences.push(format!(
                "Our score remains the same as last week's {previous}."
            ));
        }
    }

    match report.percent_change_previous {
        Some(pct) if pct > 0.0 => score_sentences.push(format!(
            "That's a {pct}% increase ⬆️ compared to our last performance."
        )),
        Some(pct) if pct < 0.0 => score_sentences.push(format!(
            "That's a {}% decrease ⬇️ compared to our last performance.",
            pct.abs()
        )),
        _ => {}
    }

    let mut rank_sentences = Vec::new();
    if let Some(rank) = &report.team_score_previous_rank {
        rank_sentences.push(format!(
            "In the previous tournament, our rank was {}.",
            rank_with_medal(rank)
        ));
    }
    rank_sentences.push(format!(
        "Our previous high score was achieved at rank {}.",
        rank_with_medal(&report.team_score_max_rank)
    ));

    Summary {
        heading: format!(
            "Tournament Rank: {}",
            rank_with_medal(&report.team_score_recent_rank)
        ),
        weekend_date: report.weekend_date.as_deref().map(WeekendDate::parse),
        score_sentences,
        rank_sentences,
    }
}

fn list_html(sentences: &[String], class: &str) -> String {
    let mut out = format!("<ul class=\"{}\">\n", encode_double_quoted_attribute(class));
    for sentence in sentences {
        out.push_str(&format!("  <li>{}</li>\n", encode_text(sentence)));
    }
    out.push_str("</ul>\n");
    out
}

pub fn summary_html(summary: &Summary) -> String {
    let mut out = String::new();
    if let Some(date) = &summary.weekend_date {
        out.push_str(&date.html());
        out.push('\n');
    }
    out.push_str(&format!(
        "<h2 class=\"text-xl font-bold mb-4\">{}</h2>\n",
        encode_text(&summary.heading)
    ));
    out.push_str(&list_html(&summary.score_sentences, "list-disc pl-5 mb-4"));
    out.push_str("<div style=\"page-break-after: always;\"></div>\n");
    out.push_str(&list_html(&summary.rank_sentences, "list-disc pl-5"));
    out
}

#[derive(Clone, Debug, PartialEq)]
pub struct PodiumRow {
    pub medal: Option<&'static str>,
    pub player_tag: String,
    pub score: String,
}

pub fn podium_rows(players: &[TopPlayer]) -> Vec<PodiumRow> {
    players
        .iter()
        .map(|p| PodiumRow {
            medal: placement_medal(p.weekend_rank),
            player_tag: p.player_tag.clone(),
            score: format_number(p.recent_score),
        })
        .collect()
}

pub fn podium_html(rows: &[PodiumRow]) -> String {
    let mut out = String::from("<h3 class=\"text-xl font-bold mb-4\">The Top Three!</h3>\n");
    out.push_str("<table class=\"w-full border-collapse\">\n");
    for row in rows {
        out.push_str("  <tr class=\"border-t\">\n");
        out.push_str(&format!(
            "    <td class=\"py-2 text-2xl\">{}</td>\n",
            row.medal.unwrap_or("")
        ));
        out.push_str(&format!(
            "    <td class=\"py-2 text-left\">{}</td>\n",
            encode_text(&row.player_tag)
        ));
        out.push_str(&format!(
            "    <td class=\"py-2 text-right\">{}</td>\n",
            encode_text(&row.score)
        ));
        out.push_str("  </tr>\n");
    }
    out.push_str("</table>\n");
    out
}

/// Summary and podium wrapped in the containers the site pages expect.
pub fn report_html(report: &WeekendReport) -> String {
    let summary = build_summary(report);
    let rows = podium_rows(&report.top_three_players);
    format!(
        "<div id=\"summary\">\n{}</div>\n<div id=\"top-players\">\n{}</div>\n",
        summary_html(&summary),
        podium_html(&rows)
    )
}
