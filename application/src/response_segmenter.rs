use domain::gateway::VideoSearch;
use domain::models::{LearningStyle, RelatedVideo};
use futures::future::join_all;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Queries beyond this many are listed as further research instead of fetched.
pub const MAX_VIDEO_LOOKUPS: usize = 6;
const VIDEOS_PER_QUERY: u32 = 1;
/// A line counts as a query when it is at most this much longer than the quote.
const QUERY_LINE_SLACK: usize = 15;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""(.*?)""#).expect("valid regex"));
static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("valid regex"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredReply {
    #[serde(default)]
    explanation: Option<String>,
    suggested_queries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentedReply {
    pub lines: Vec<String>,
    pub queries: Vec<String>,
}

impl SegmentedReply {
    pub fn explanation(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReply {
    pub text: String,
    /// Present only when lookups ran (visual learner with queries).
    pub video_list: Option<Vec<RelatedVideo>>,
}

/// Quoted text of a line that is mostly one quoted phrase.
pub fn query_in_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let quoted = QUOTED.captures(trimmed)?.get(1)?.as_str();
    if !quoted.is_empty() && trimmed.chars().count() < quoted.chars().count() + QUERY_LINE_SLACK {
        Some(quoted)
    } else {
        None
    }
}

/// Line heuristic: quote-dominated lines become queries, the rest is prose.
pub fn split_quoted_lines(raw: &str) -> SegmentedReply {
    let mut segmented = SegmentedReply::default();
    for line in raw.split('\n') {
        match query_in_line(line) {
            Some(query) => {
                tracing::debug!(query, "found suggested query");
                segmented.queries.push(query.to_string());
            }
            None => segmented.lines.push(line.to_string()),
        }
    }
    segmented
}

/// A fenced ```json block carrying `suggestedQueries` takes precedence over
/// the line heuristic.
pub fn parse_structured(raw: &str) -> Option<SegmentedReply> {
    for captures in JSON_FENCE.captures_iter(raw) {
        let (Some(block), Some(body)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let Ok(reply) = serde_json::from_str::<StructuredReply>(body.as_str()) else {
            continue;
        };
        let prose = match reply.explanation.filter(|e| !e.trim().is_empty()) {
            Some(explanation) => explanation,
            None => format!("{}{}", &raw[..block.start()], &raw[block.end()..]),
        };
        let queries = reply
            .suggested_queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        return Some(SegmentedReply {
            lines: prose.split('\n').map(str::to_string).collect(),
            queries,
        });
    }
    None
}

pub fn segment_reply(raw: &str) -> SegmentedReply {
    parse_structured(raw).unwrap_or_else(|| split_quoted_lines(raw))
}

pub struct ResponseSegmenter<V> {
    videos: V,
}

impl<V: VideoSearch> ResponseSegmenter<V> {
    pub fn new(videos: V) -> Self {
        Self { videos }
    }

    pub fn videos(&self) -> &V {
        &self.videos
    }

    /// Split the reply and, for visual learners, attach one video per query
    /// for the first [`MAX_VIDEO_LOOKUPS`] queries.
    pub async fn resolve(&self, raw: &str, style: LearningStyle) -> ResolvedReply {
        let SegmentedReply { mut lines, queries } = segment_reply(raw);

        if style != LearningStyle::Visual || queries.is_empty() {
            tracing::debug!(style = style.as_str(), queries = queries.len(), "skipping video lookups");
            return ResolvedReply {
                text: lines.join("\n").trim().to_string(),
                video_list: None,
            };
        }

        let lookups = queries
            .iter()
            .take(MAX_VIDEO_LOOKUPS)
            .map(|query| self.videos.search_videos(query, VIDEOS_PER_QUERY));
        let videos: Vec<RelatedVideo> = join_all(lookups).await.into_iter().flatten().flatten().collect();
        tracing::debug!(found = videos.len(), "video lookups finished");

        let overflow = queries.get(MAX_VIDEO_LOOKUPS..).unwrap_or_default();
        if !overflow.is_empty() {
            lines.push("\n\n---".to_string());
            lines.push("### For Further Research:".to_string());
            lines.extend(
                overflow
                    .iter()
                    .map(|q| format!("- You can also search for: \"{q}\"")),
            );
        }

        ResolvedReply {
            text: lines.join("\n").trim().to_string(),
            video_list: Some(videos),
        }
    }
}
