// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `predict`, and all
// their configurable flags. Defaults reproduce the reference
// run: t1.ASC, columns 1..7, 49 800 training rows, windows of
// 200 rows every 20 rows, batches of 32, 10 epochs.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the attention regressor on a sensor file
    Train(TrainArgs),

    /// Predict one window using a trained checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Delimited sensor file to train on
    #[arg(long, default_value = "t1.ASC")]
    pub data_path: String,

    /// Directory to save checkpoints, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Header lines to skip at the top of the file
    #[arg(long, default_value_t = 8)]
    pub skip_header: usize,

    /// Field delimiter
    #[arg(long, default_value_t = ';')]
    pub delimiter: char,

    /// First column to keep (inclusive)
    #[arg(long, default_value_t = 1)]
    pub first_column: usize,

    /// Last column to keep (exclusive); the last kept column is the target
    #[arg(long, default_value_t = 7)]
    pub last_column: usize,

    /// Rows used for training, counted from the top of the data
    #[arg(long, default_value_t = 49_800)]
    pub train_rows: usize,

    /// Rows right after the training rows held out for the final prediction
    #[arg(long, default_value_t = 200)]
    pub test_rows: usize,

    /// Time steps per window
    #[arg(long, default_value_t = 200)]
    pub window_size: usize,

    /// Rows between the starts of consecutive windows
    #[arg(long, default_value_t = 20)]
    pub step_size: usize,

    /// Windows per batch
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Number of full passes through the training windows
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// RMSprop learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Attention heads
    #[arg(long, default_value_t = 4)]
    pub num_heads: usize,

    /// Key / query size per attention head
    #[arg(long, default_value_t = 200)]
    pub key_dim: usize,

    /// Channels of the first feed-forward convolution
    #[arg(long, default_value_t = 3)]
    pub ff_hidden: usize,

    /// Units of each dense layer in the regression head
    #[arg(long, default_value_t = 128)]
    pub mlp_units: usize,

    /// Dropout probability used in every block
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Visit batches in start order instead of shuffling them each epoch
    #[arg(long)]
    pub no_shuffle: bool,

    /// Seed for the batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:      a.data_path,
            checkpoint_dir: a.checkpoint_dir,
            skip_header:    a.skip_header,
            delimiter:      a.delimiter,
            first_column:   a.first_column,
            last_column:    a.last_column,
            train_rows:     a.train_rows,
            test_rows:      a.test_rows,
            window_size:    a.window_size,
            step_size:      a.step_size,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            num_heads:      a.num_heads,
            key_dim:        a.key_dim,
            ff_hidden:      a.ff_hidden,
            mlp_units:      a.mlp_units,
            dropout:        a.dropout,
            shuffle:        !a.no_shuffle,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory where `train` saved its checkpoints
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Sensor file to read; defaults to the file used for training
    #[arg(long)]
    pub data_path: Option<String>,

    /// First row of the window; defaults to the row after the training rows
    #[arg(long)]
    pub offset: Option<usize>,
}
