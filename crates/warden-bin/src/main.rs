// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Warden gateway binary entry point.

use warden_bin::cli::Cli;
use warden_bin::error::report_error_and_exit;
use warden_bin::{commands, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    logging::init_logging(cli.effective_log_level(), cli.log_format);

    if let Err(e) = commands::execute(cli).await {
        report_error_and_exit(e);
    }
}
