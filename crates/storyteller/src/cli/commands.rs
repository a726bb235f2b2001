//! CLI command definitions.

use clap::{Args, Parser, Subcommand};

/// Storyteller - narrated, illustrated stories from a title and a topic
#[derive(Parser, Debug)]
#[command(name = "storyteller")]
#[command(about = "Generate narrated, illustrated story bundles", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Title and topic of a new story.
#[derive(Args, Debug, Clone)]
pub struct StoryArgs {
    /// Title of the story
    #[arg(short, long)]
    pub title: String,

    /// Topic of the story (e.g. Interesting Facts, History)
    #[arg(short = 'p', long)]
    pub topic: String,

    /// OpenAI API key (overrides OPENAI_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the story, images, narration and timeline
    Generate {
        #[command(flatten)]
        story: StoryArgs,

        /// ElevenLabs API key (overrides ELEVENLABS_API_KEY)
        #[arg(long)]
        elevenlabs_api_key: Option<String>,
    },

    /// Print the story text without generating media
    Preview {
        #[command(flatten)]
        story: StoryArgs,
    },

    /// Narrate an existing story again, keeping its text and images
    RegenerateAudio {
        /// Title the story was generated with
        #[arg(short, long)]
        title: String,

        /// ElevenLabs API key (overrides ELEVENLABS_API_KEY)
        #[arg(long)]
        elevenlabs_api_key: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_accepts_short_flags() {
        let cli = Cli::try_parse_from([
            "storyteller", "generate", "-t", "Mars", "-p", "Facts", "-k", "sk-test",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { story, elevenlabs_api_key } => {
                assert_eq!(story.title, "Mars");
                assert_eq!(story.topic, "Facts");
                assert_eq!(story.api_key.as_deref(), Some("sk-test"));
                assert!(elevenlabs_api_key.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn missing_topic_is_an_error() {
        assert!(Cli::try_parse_from(["storyteller", "preview", "--title", "Mars"]).is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "storyteller", "regenerate-audio", "--title", "Mars", "--verbose", "--json-logs",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::RegenerateAudio { .. }));
    }
}
