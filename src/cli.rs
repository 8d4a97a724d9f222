//! Drives the command-line program.

use crate::clock::SystemClock;
use crate::conf::Settings;
use crate::mastodon::client::{MastodonService, Poster};
use crate::study::{ScoredVideo, StudyResult, VideoAnalyst};
use crate::text::MASTODON_CHAR_LIMIT;
use crate::youtube::Channel;
use crate::youtube::auth::{Authenticator, GoogleTokenService, TokenStore};
use crate::youtube::service::YouTubeService;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use itertools::Itertools;
use log::warn;
use std::process;

pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Scores a YouTube channel's recent videos and toots the standouts", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Acquire and store a YouTube API access token
    Auth {
        /// Skip the refresh grant and mint a brand-new token
        #[arg(long, default_value_t = false)]
        fresh: bool,
    },

    /// Score a channel's recent videos
    #[clap(alias = "v")]
    Videos {
        /// YouTube channel ID
        channel_id: String,
    },

    /// Compare several channels' recent videos against each other
    Compare {
        /// YouTube channel IDs
        channel_ids: Vec<String>,
    },

    /// Post a message to Mastodon, split into a thread if necessary
    Post {
        /// The message to post
        message: String,
    },
}

/// Runs the command-line program using the given `config`.
pub async fn run(config: Config) {
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => die(2, &err.to_string()),
    };

    Runner { config, settings }.run().await
}

/// Runs the command-line program.
#[derive(Debug)]
struct Runner {
    config: Config,
    settings: Settings,
}

impl Runner {
    async fn run(&self) {
        match &self.config.command {
            Command::Auth { fresh } => self.run_auth(*fresh).await,
            Command::Videos { channel_id } => self.run_videos(channel_id).await,
            Command::Compare { channel_ids } => self.run_compare(channel_ids).await,
            Command::Post { message } => self.run_post(message).await,
        }
    }

    fn authenticator(&self) -> Authenticator<GoogleTokenService> {
        let store = match TokenStore::load(&self.settings.tokens_path) {
            Ok(store) => store,
            Err(err) => die(1, &err.to_string()),
        };
        Authenticator::new(&self.settings, store)
    }

    async fn run_auth(&self, fresh: bool) {
        let mut auth = self.authenticator();
        if !auth.ensure_token(fresh).await {
            die(1, "could not acquire an access token");
        }
        println!("authenticated as {}", self.settings.username);
    }

    async fn youtube_service(&self) -> YouTubeService {
        let mut auth = self.authenticator();
        if !auth.ensure_token(false).await {
            // The API key alone is enough for read-only calls.
            warn!("proceeding without an access token");
        }
        YouTubeService::new(auth.api_key(), auth.bearer_token())
    }

    async fn fetch_channel(&self, service: &YouTubeService, channel_id: &str) -> Channel {
        match Channel::new(channel_id, service).await {
            Ok(channel) => channel,
            Err(err) => die(1, &err.to_string()),
        }
    }

    async fn run_videos(&self, channel_id: &str) {
        let service = self.youtube_service().await;
        let channel = self.fetch_channel(&service, channel_id).await;
        if !channel.has_videos() {
            println!("{} has no videos.", channel.id());
            return;
        }

        let result = match channel.study().analyze(&SystemClock::default()) {
            Ok(result) => result,
            Err(err) => die(1, &err.to_string()),
        };
        println!("{}", view_result(&result));
    }

    async fn run_compare(&self, channel_ids: &[String]) {
        if channel_ids.len() < 2 {
            die(2, "compare needs at least two channel IDs");
        }

        let service = self.youtube_service().await;
        let mut analyst = VideoAnalyst::new();
        for channel_id in channel_ids {
            let channel = self.fetch_channel(&service, channel_id).await;
            if !analyst.add_batch(channel.id(), channel.videos().cloned().collect()) {
                warn!("channel {} given more than once; keeping the first", channel.id());
            }
        }

        let analysis = match analyst.analyze(&SystemClock::default()) {
            Ok(analysis) => analysis,
            Err(err) => die(1, &err.to_string()),
        };

        for (name, result) in analysis.results() {
            println!("== {name} ==\n{}\n", view_result(result));
        }

        println!("best view score:    {}", name_or_dash(analysis.top_view_channel()));
        println!("best like ratio:    {}", name_or_dash(analysis.top_like_channel()));
        println!("best dislike ratio: {}", name_or_dash(analysis.top_dislike_channel()));
        println!("best comment ratio: {}", name_or_dash(analysis.top_comment_channel()));
    }

    async fn run_post(&self, message: &str) {
        let service = MastodonService::new(
            self.settings.mastodon_url.clone(),
            self.settings.mastodon_token.clone(),
        );
        let poster = Poster::new(service);
        match poster.post(message).await {
            Ok(statuses) => {
                for status in &statuses {
                    println!("posted {}", status.url());
                }
                if statuses.len() > 1 {
                    println!(
                        "split into {} posts of at most {} characters",
                        statuses.len(),
                        MASTODON_CHAR_LIMIT
                    );
                }
            }
            Err(err) => die(1, &err.to_string()),
        }
    }
}

fn name_or_dash(name: Option<&str>) -> &str {
    name.unwrap_or("-")
}

fn view_result(result: &StudyResult) -> String {
    let lines = result
        .scored()
        .map(|scored| {
            let scores = scored.scores();
            format!(
                "{:<40} views/kmin {:>8} like {:.3} dislike {:.3} comment {:.3}",
                scored.video().title(),
                scores.view_score(),
                scores.like_score(),
                scores.dislike_score(),
                scores.comment_score(),
            )
        })
        .join("\n");

    let extremes = [
        ("most liked", result.most_liked()),
        ("most disliked", result.most_disliked()),
        ("top view score", result.top_view_score()),
        ("top like ratio", result.top_like_score()),
        ("top dislike ratio", result.top_dislike_score()),
        ("top comment ratio", result.top_comment_score()),
    ]
    .into_iter()
    .filter_map(|(label, scored)| scored.map(|s| format!("{label}: {}", title_of(s))))
    .join("\n");

    format!("{lines}\n\n{extremes}")
}

fn title_of(scored: &ScoredVideo) -> &str {
    scored.video().title()
}
