use std::path::Path;
use std::process::ExitCode;

use mesh_fracture::config::FractureConfig;
use mesh_fracture::fracture::driver::run;

fn usage() {
    eprintln!("usage: mesh-fracture <config.json>");
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        usage();
        return ExitCode::from(2);
    }

    let config = match FractureConfig::from_json_file(Path::new(&args[1])) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(summary) => {
            println!("open_nodes: {}", summary.open_nodes);
            println!("new_nodes: {}", summary.new_nodes);
            println!("new_edges: {}", summary.new_edges);
            println!("new_faces: {}", summary.new_faces);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("fracture failed: {err}");
            ExitCode::from(1)
        }
    }
}
