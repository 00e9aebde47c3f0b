use {
    std::{
        env,
        fs::File,
        io::{BufWriter, Write},
        path::PathBuf,
        process::exit,
        time::Duration,
    },
    tracing_subscriber::EnvFilter,
    uipsat::{
        config::{ReductionModel, RestartStrategy},
        solver::SolverResult,
        types::Lit,
        Certificate, Config, SolveIF, Solver,
    },
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP: &str = "\
uipsat [OPTIONS] <CNF>

OPTIONS:
  -v, -vv, -vvv       log at info, debug, or trace level (RUST_LOG overrides)
  --luby              Luby restarts (default)
  --glucose           glucose-style restarts
  --agile             reduce at growing intervals (default)
  --geometric         reduce at a geometrically growing clause limit
  --timeout <SECS>    give up after this wall-clock time
  --budget <N>        give up after this many conflicts
  --assume <LIT>      solve under a DIMACS literal; repeatable
  --show-model        print the model in `v` lines
  --save-model <FILE> write the answer to a file
  --version           print the version
  --help              print this message";

/// print `msg` with the usage and quit.
fn usage_error(msg: &str) -> ! {
    eprintln!("{msg}\n{HELP}");
    exit(1);
}

/// return the value of an option taking one.
fn option_value<T: std::str::FromStr>(opt: &str, arg: Option<String>) -> T {
    match arg.as_deref().map(str::parse) {
        Some(Ok(v)) => v,
        Some(Err(_)) => usage_error(&format!("invalid value for {opt}")),
        None => usage_error(&format!("{opt} needs a value")),
    }
}

/// The contents of the `--save-model` file: `SAT` and the model ending in `0`,
/// `UNSAT`, or `INDET` if no answer was found.
fn answer_file_text(result: &SolverResult) -> String {
    match result {
        Ok(Certificate::SAT(v)) => {
            let mut text = String::from("SAT\n");
            for x in v {
                text.push_str(&format!("{x} "));
            }
            text.push_str("0\n");
            text
        }
        Ok(Certificate::UNSAT) => "UNSAT\n".to_string(),
        Ok(Certificate::AssumptionFail) | Err(_) => "INDET\n".to_string(),
    }
}

fn main() {
    let mut config = Config::default();
    let mut verbosity = 0;
    let mut target: Option<PathBuf> = None;
    let mut assumptions: Vec<i32> = Vec::new();
    let mut show_model = false;
    let mut model_file: Option<PathBuf> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" => {
                println!("uipsat {VERSION}");
                exit(0);
            }
            "--help" | "-h" => {
                println!("{HELP}");
                exit(0);
            }
            "--luby" => config.restart_strategy = RestartStrategy::Luby,
            "--glucose" => config.restart_strategy = RestartStrategy::Glucose,
            "--agile" => config.reduction_model = ReductionModel::Agile,
            "--geometric" => config.reduction_model = ReductionModel::Geometric,
            "--timeout" => {
                let secs: f64 = option_value(&arg, args.next());
                match Duration::try_from_secs_f64(secs) {
                    Ok(d) => config.timeout = Some(d),
                    Err(_) => usage_error("invalid value for --timeout"),
                }
            }
            "--budget" => config.conflict_budget = Some(option_value(&arg, args.next())),
            "--assume" => assumptions.push(option_value(&arg, args.next())),
            "--show-model" => show_model = true,
            "--save-model" => model_file = Some(option_value(&arg, args.next())),
            _ if arg.starts_with("-v") && arg[1..].chars().all(|c| c == 'v') => {
                verbosity += arg.len() - 1;
            }
            _ if arg.starts_with('-') => usage_error(&format!("unknown option: {arg}")),
            _ => target = Some(PathBuf::from(arg)),
        }
    }
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let Some(path) = target else {
        usage_error("no CNF file given");
    };
    let mut s = match Solver::build(&config, &path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("c {}: {e}", path.display());
            exit(1);
        }
    };
    for x in assumptions {
        let Some(lit) = Lit::try_from_dimacs(x, s.asg.num_vars) else {
            eprintln!("c invalid assumption {x}");
            exit(1);
        };
        if !s.asg.is_assumed(lit) {
            s.asg.assumption_enable(lit);
        }
    }
    let result = s.solve();
    println!("{}", s.state);
    if let Some(file) = model_file {
        let written = File::create(&file).and_then(|out| {
            let mut buf = BufWriter::new(out);
            buf.write_all(answer_file_text(&result).as_bytes())?;
            buf.flush()
        });
        if let Err(e) = written {
            eprintln!("c failed to save the answer to {}: {e}", file.display());
        }
    }
    match result {
        Ok(Certificate::SAT(v)) => {
            println!("s SATISFIABLE");
            if show_model {
                for chunk in v.chunks(10) {
                    let line = chunk.iter().map(|x| x.to_string()).collect::<Vec<_>>();
                    println!("v {}", line.join(" "));
                }
                println!("v 0");
            }
            exit(10);
        }
        Ok(Certificate::UNSAT) => {
            println!("s UNSATISFIABLE");
            exit(20);
        }
        Ok(Certificate::AssumptionFail) => {
            println!("s ASSUMPTIONFAIL");
            exit(20);
        }
        Err(e) => {
            println!("s UNKNOWN");
            eprintln!("c {e}");
            exit(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, uipsat::SolverError};

    #[test]
    fn test_answer_file_text() {
        let sat: SolverResult = Ok(Certificate::SAT(vec![1, -2, 3]));
        assert_eq!(answer_file_text(&sat), "SAT\n1 -2 3 0\n");
        assert_eq!(answer_file_text(&Ok(Certificate::UNSAT)), "UNSAT\n");
        assert_eq!(answer_file_text(&Ok(Certificate::AssumptionFail)), "INDET\n");
        assert_eq!(answer_file_text(&Err(SolverError::Interrupted)), "INDET\n");
    }

    #[test]
    fn test_option_value_parses() {
        let n: usize = option_value("--budget", Some("42".to_string()));
        assert_eq!(n, 42);
        let l: i32 = option_value("--assume", Some("-7".to_string()));
        assert_eq!(l, -7);
    }
}
