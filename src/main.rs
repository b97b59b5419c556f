use std::env;
use std::process::ExitCode;

use kalah_book::board::{SearchLogger, StdoutLogger};
use kalah_book::book::BookError;
use kalah_book::options::{BookOptions, WorkerSelection};
use kalah_book::partition::{BookRun, MoveSummary, Partition};

fn run(options: BookOptions) -> Result<Vec<MoveSummary>, BookError> {
    let run = BookRun::new(options.params, options.out_dir);
    let logger = StdoutLogger;

    if let Some(first_move) = options.first_move {
        let summary = run.run_move(first_move)?;
        logger.info(&summary.info());
        return Ok(vec![summary]);
    }

    match options.worker {
        WorkerSelection::All => run.run_all(options.workers, &logger),
        WorkerSelection::One(index) => {
            let partition = Partition::new(&run.root_moves(), options.workers, index)?;
            run.run_partition(&partition, &logger)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match BookOptions::from_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!(
                "usage: kalah_book [side=south|north] [horizon=N|none] [counting=perspective|every] \
                 [cutoff=on|off] [table=N|tree=N|record=off] [workers=N] [worker=N|all] [move=N] [out=DIR]"
            );
            return ExitCode::from(1);
        }
    };

    match run(options) {
        Ok(summaries) => {
            let files: usize = summaries.iter().map(|s| s.files.len()).sum();
            log::info!("{} first moves searched, {} files written", summaries.len(), files);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}
