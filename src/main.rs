use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Cut an mp4 file at the sync point nearest to a time offset, or list its sync points.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The mp4 file to read.
    file: PathBuf,
    /// The cut time in seconds; omitted, the sync points are printed instead.
    time: Option<f64>,
    /// Where to write the resulting file.
    #[arg(short, long, default_value = "out.mp4")]
    output: PathBuf,
    /// Move the movie header in front of the media data instead of cutting.
    #[arg(long, conflicts_with = "time")]
    faststart: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> mp4cut::Result<()> {
    let mut src = BufReader::new(File::open(&args.file)?);

    if args.faststart {
        let mut dst = BufWriter::new(File::create(&args.output)?);
        if mp4cut::move_header_and_write(&mut src, &mut dst)? {
            dst.flush()?;
        } else {
            println!("the header already precedes the media data, nothing to do");
        }
    } else if let Some(t) = args.time {
        let mut dst = BufWriter::new(File::create(&args.output)?);
        mp4cut::split_and_write(&mut src, &mut dst, t)?;
        dst.flush()?;
    } else {
        for t in mp4cut::get_sync_points(&mut src)? {
            println!("{t}");
        }
    }

    Ok(())
}
