// SPDX-License-Identifier: Apache-2.0

//! Engagement scoring for batches of videos.
//!
//! A [`VideoStudy`] scores one batch of videos and picks out the
//! extremes for each metric; a [`VideoAnalyst`] compares named batches
//! against each other. Scoring is pure: the same videos and the same
//! clock always produce the same result.

use crate::clock::{Clock, HasAge};
use crate::youtube::video::VideoRecord;
use std::collections::BTreeMap;
use thiserror::Error;

/// The derived engagement scores for one video.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VideoScores {
    view_score: f64,
    like_score: f64,
    dislike_score: f64,
    comment_score: f64,
}

impl VideoScores {
    /// Views accrued per thousand minutes since publication.
    pub fn view_score(&self) -> f64 {
        self.view_score
    }

    /// Likes as a fraction of views.
    pub fn like_score(&self) -> f64 {
        self.like_score
    }

    /// Dislikes as a fraction of views.
    pub fn dislike_score(&self) -> f64 {
        self.dislike_score
    }

    /// Comments as a fraction of views.
    pub fn comment_score(&self) -> f64 {
        self.comment_score
    }
}

/// A video paired with its scores.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredVideo {
    video: VideoRecord,
    scores: VideoScores,
}

impl ScoredVideo {
    /// The scored video.
    pub fn video(&self) -> &VideoRecord {
        &self.video
    }

    /// The video's scores.
    pub fn scores(&self) -> &VideoScores {
        &self.scores
    }
}

/// Indicates an error scoring a batch of videos.
#[derive(Debug, Error)]
pub enum Error {
    /// A video's publication time is not in the past, so its
    /// time-based score is undefined.
    #[error("video {id} has no elapsed time to score against")]
    NoElapsedTime { id: String },
}

/// A scoring study over one batch of videos.
#[derive(Clone, Debug)]
pub struct VideoStudy {
    videos: Vec<VideoRecord>,
}

impl VideoStudy {
    /// Creates a study over the given videos.
    pub fn new(videos: Vec<VideoRecord>) -> Self {
        Self { videos }
    }

    /// Scores every video in the batch and picks the per-metric
    /// extremes.
    ///
    /// Fails if any video was published zero minutes ago or in the
    /// future; a partial result would silently misrank the rest.
    pub fn analyze<C: Clock>(&self, clock: &C) -> Result<StudyResult, Error> {
        let scored = self
            .videos
            .iter()
            .map(|video| score(video, clock))
            .collect::<Result<Vec<_>, _>>()?;

        let most_liked = earliest_max(&scored, |s| s.video.like_count() as f64);
        let most_disliked = earliest_max(&scored, |s| s.video.dislike_count() as f64);
        let top_view_score = earliest_max(&scored, |s| s.scores.view_score);
        let top_like_score = earliest_max(&scored, |s| s.scores.like_score);
        let top_dislike_score = earliest_max(&scored, |s| s.scores.dislike_score);
        let top_comment_score = earliest_max(&scored, |s| s.scores.comment_score);

        Ok(StudyResult {
            most_liked,
            most_disliked,
            top_view_score,
            top_like_score,
            top_dislike_score,
            top_comment_score,
            scored,
        })
    }
}

fn score<C: Clock>(video: &VideoRecord, clock: &C) -> Result<ScoredVideo, Error> {
    let minutes = video.age(clock).num_minutes();
    if minutes <= 0 {
        return Err(Error::NoElapsedTime {
            id: String::from(video.id()),
        });
    }

    // Integer division, deliberately: a video has to earn each whole
    // view-per-thousand-minutes step.
    let view_score = (video.view_count() * 1000 / minutes as u64) as f64;

    Ok(ScoredVideo {
        video: video.clone(),
        scores: VideoScores {
            view_score,
            like_score: ratio(video.like_count(), video.view_count()),
            dislike_score: ratio(video.dislike_count(), video.view_count()),
            comment_score: ratio(video.comment_count(), video.view_count()),
        },
    })
}

fn ratio(count: u64, views: u64) -> f64 {
    if views == 0 {
        0.0
    } else {
        count as f64 / views as f64
    }
}

/// The earliest element with the maximum key. Ties keep the first
/// occurrence, matching batch order.
fn earliest_max<F>(scored: &[ScoredVideo], key: F) -> Option<ScoredVideo>
where
    F: Fn(&ScoredVideo) -> f64,
{
    scored
        .iter()
        .fold(None::<&ScoredVideo>, |best, candidate| match best {
            Some(best) if key(candidate) <= key(best) => Some(best),
            _ => Some(candidate),
        })
        .cloned()
}

/// The outcome of analyzing one batch of videos.
///
/// Every extreme is `None` exactly when the batch was empty.
#[derive(Clone, Debug)]
pub struct StudyResult {
    most_liked: Option<ScoredVideo>,
    most_disliked: Option<ScoredVideo>,
    top_view_score: Option<ScoredVideo>,
    top_like_score: Option<ScoredVideo>,
    top_dislike_score: Option<ScoredVideo>,
    top_comment_score: Option<ScoredVideo>,
    scored: Vec<ScoredVideo>,
}

impl StudyResult {
    /// The video with the most likes, by raw count.
    pub fn most_liked(&self) -> Option<&ScoredVideo> {
        self.most_liked.as_ref()
    }

    /// The video with the most dislikes, by raw count.
    pub fn most_disliked(&self) -> Option<&ScoredVideo> {
        self.most_disliked.as_ref()
    }

    /// The video with the highest view score.
    pub fn top_view_score(&self) -> Option<&ScoredVideo> {
        self.top_view_score.as_ref()
    }

    /// The video with the highest like ratio.
    pub fn top_like_score(&self) -> Option<&ScoredVideo> {
        self.top_like_score.as_ref()
    }

    /// The video with the highest dislike ratio.
    pub fn top_dislike_score(&self) -> Option<&ScoredVideo> {
        self.top_dislike_score.as_ref()
    }

    /// The video with the highest comment ratio.
    pub fn top_comment_score(&self) -> Option<&ScoredVideo> {
        self.top_comment_score.as_ref()
    }

    /// Every scored video, in batch order.
    pub fn scored(&self) -> impl Iterator<Item = &ScoredVideo> {
        self.scored.iter()
    }

    /// True if the batch had no videos to score.
    pub fn is_empty(&self) -> bool {
        self.scored.is_empty()
    }
}

/// Compares named batches of videos against each other.
#[derive(Debug, Default)]
pub struct VideoAnalyst {
    batches: BTreeMap<String, VideoStudy>,
}

impl VideoAnalyst {
    /// Creates an analyst with no batches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named batch of videos.
    ///
    /// Returns `false`, leaving the existing batch in place, if a batch
    /// with this name has already been added.
    pub fn add_batch(&mut self, name: impl Into<String>, videos: Vec<VideoRecord>) -> bool {
        let name = name.into();
        if self.batches.contains_key(&name) {
            return false;
        }
        self.batches.insert(name, VideoStudy::new(videos));
        true
    }

    /// Analyzes every batch and compares their extremes.
    pub fn analyze<C: Clock>(&self, clock: &C) -> Result<Analysis, Error> {
        let results = self
            .batches
            .iter()
            .map(|(name, study)| Ok((name.clone(), study.analyze(clock)?)))
            .collect::<Result<BTreeMap<_, _>, Error>>()?;

        let top_view_channel = best_key(&results, |r| {
            r.top_view_score().map(|s| s.scores().view_score())
        });
        let top_like_channel = best_key(&results, |r| {
            r.top_like_score().map(|s| s.scores().like_score())
        });
        let top_dislike_channel = best_key(&results, |r| {
            r.top_dislike_score().map(|s| s.scores().dislike_score())
        });
        let top_comment_channel = best_key(&results, |r| {
            r.top_comment_score().map(|s| s.scores().comment_score())
        });

        Ok(Analysis {
            results,
            top_view_channel,
            top_like_channel,
            top_dislike_channel,
            top_comment_channel,
        })
    }
}

/// The batch name whose extreme for one metric beats every other
/// batch's. Strictly-greater comparison, so ties go to the
/// lexicographically-first batch. Batches with no extreme, which is to
/// say empty ones, are skipped.
fn best_key<K>(results: &BTreeMap<String, StudyResult>, key: K) -> Option<String>
where
    K: Fn(&StudyResult) -> Option<f64>,
{
    let mut best: Option<(&String, f64)> = None;
    for (name, result) in results {
        let Some(value) = key(result) else {
            continue;
        };
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((name, value)),
        }
    }
    best.map(|(name, _)| name.clone())
}

/// The outcome of comparing batches against each other.
#[derive(Debug)]
pub struct Analysis {
    results: BTreeMap<String, StudyResult>,
    top_view_channel: Option<String>,
    top_like_channel: Option<String>,
    top_dislike_channel: Option<String>,
    top_comment_channel: Option<String>,
}

impl Analysis {
    /// Per-batch results, in batch-name order.
    pub fn results(&self) -> impl Iterator<Item = (&str, &StudyResult)> {
        self.results.iter().map(|(name, result)| (name.as_str(), result))
    }

    /// The result for one batch.
    pub fn result(&self, name: &str) -> Option<&StudyResult> {
        self.results.get(name)
    }

    /// The batch with the best view score across all batches.
    pub fn top_view_channel(&self) -> Option<&str> {
        self.top_view_channel.as_deref()
    }

    /// The batch with the best like ratio across all batches.
    pub fn top_like_channel(&self) -> Option<&str> {
        self.top_like_channel.as_deref()
    }

    /// The batch with the best dislike ratio across all batches.
    pub fn top_dislike_channel(&self) -> Option<&str> {
        self.top_dislike_channel.as_deref()
    }

    /// The batch with the best comment ratio across all batches.
    pub fn top_comment_channel(&self) -> Option<&str> {
        self.top_comment_channel.as_deref()
    }
}
