mod bttv;
mod context;
mod download;
mod emote;
mod endpoints;
mod fs;
mod logging;
mod manifest;
mod opt;
mod report;
mod slack;
mod source;
mod twitch;

use context::Context;
use opt::Opt;

use log::{error, info, warn};
use structopt::StructOpt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();
    let opt = Opt::from_args();

    if let Err(err) = logging::init(opt.log_level) {
        eprintln!("couldn't set up logging: {err}");
    }

    let credentials = match opt.credentials() {
        Ok(val) => val,
        Err(err) => {
            println!("{err}");
            std::process::exit(1);
        }
    };

    let list_only = opt.list;
    let ctx = match Context::new(opt, credentials) {
        Ok(val) => val,
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    };

    match ctx.run().await {
        Ok(report) => {
            if !list_only && report.acquired > 0 && report.attempted() == 0 {
                warn!("no emote made it to the upload step");
            }
            info!("{report}");
        }
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
}
