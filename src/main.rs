use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dicom_convert::{
    ConversionConfig, NarrowingPolicy, SliceFormat, SliceViewer, convert, logging::init_logging,
};

#[derive(Parser)]
#[command(name = "dicom-convert")]
#[command(about = "Convert DICOM/IMA slice series into NIfTI, NumPy or JPEG")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the largest series in a directory to NIfTI
    Nii {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory
        #[arg(short, long, default_value = "nii")]
        output: PathBuf,

        /// Output file name; a .gz suffix compresses
        #[arg(short, long, default_value = "patient.nii.gz")]
        name: String,
    },

    /// Convert the largest series in a directory to a (slice, row, col) .npy array
    Npy {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory
        #[arg(short, long, default_value = "npy")]
        output: PathBuf,

        /// Output file name
        #[arg(short, long, default_value = "volume.npy")]
        name: String,
    },

    /// Write every slice as a numbered JPEG
    Jpg {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory
        #[arg(short, long, default_value = "jpg")]
        output: PathBuf,
    },

    /// Render one slice of a saved .npy volume to an image file
    View {
        /// Path to the .npy volume
        npy: PathBuf,

        /// Slice index to render
        #[arg(short, long, default_value = "0")]
        slice: usize,

        /// Output image (format from extension)
        #[arg(short, long, default_value = "slice.png")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Directory containing the slice files
    #[arg(short, long)]
    input: PathBuf,

    /// Which file extensions to pick up
    #[arg(short, long, value_enum, default_value = "any")]
    format: FormatArg,

    /// Clamp voxels outside the 16-bit range instead of failing
    #[arg(long)]
    saturate: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Dcm,
    Ima,
    Any,
}

impl From<FormatArg> for SliceFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Dcm => SliceFormat::Dicom,
            FormatArg::Ima => SliceFormat::Ima,
            FormatArg::Any => SliceFormat::Any,
        }
    }
}

impl InputArgs {
    fn config(&self, output: PathBuf, name: &str) -> Result<ConversionConfig> {
        let narrowing = if self.saturate {
            NarrowingPolicy::Saturate
        } else {
            NarrowingPolicy::Reject
        };
        Ok(ConversionConfig::new(&self.input, output, name)?
            .with_slice_format(self.format.into())
            .with_narrowing(narrowing))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Nii { input, output, name } => {
            convert::dicom_to_nifti(&input.config(output, &name)?)?;
        }
        Commands::Npy { input, output, name } => {
            convert::dicom_to_npy(&input.config(output, &name)?)?;
        }
        Commands::Jpg { input, output } => {
            convert::dicom_to_jpeg(&input.input, output, input.format.into())?;
        }
        Commands::View { npy, slice, output } => {
            let mut viewer = SliceViewer::from_npy(&npy)?;
            viewer.set_slice_index(slice)?;
            viewer.render().save(&output)?;
            tracing::info!("Saved {}", output.display());
        }
    }

    Ok(())
}
