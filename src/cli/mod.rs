use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ytsound",
    about = "ytsound - Download music from video sites, optionally cropped to a time interval",
    version,
    long_about = "Downloads the audio track of a video with yt-dlp, crops it to the given interval and converts it with ffmpeg. The result is a single audio file in the chosen directory."
)]
pub struct Cli {
    /// Downloads sound from the video at the given url
    #[arg(short, long, value_name = "URL", required_unless_present = "show_config")]
    pub url: Option<String>,

    /// Final extension of the file (defaults to the source's)
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Crops the audio to [START, END]; a single value crops to [0, END]. Times are `m` or `m:s`
    #[arg(short, long, value_name = "TIME", num_args = 1..)]
    pub interval: Option<Vec<String>>,

    /// Custom name for the output file, optionally with extension
    #[arg(short, long, value_name = "NAME")]
    pub filename: Option<String>,

    /// Output directory (defaults to your music directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Show current configuration and exit
    #[arg(long)]
    pub show_config: bool,
}
