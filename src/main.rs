use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use miette::IntoDiagnostic;
use miette::Report;
use miette::WrapErr;
use shunting_calc::CalcError;
use shunting_calc::Lexer;
use shunting_calc::VariableTable;
use shunting_calc::repl::Session;
use shunting_calc::vars::parse_assignment;

#[derive(Parser, Debug)]
#[command(version, about = "Evaluate infix expressions with the shunting-yard algorithm")]
struct Args {
    /// Preset a variable, e.g. `--var x=1.5`. May be given more than once.
    #[arg(long = "var", value_name = "LETTER=VALUE", value_parser = parse_assignment, global = true)]
    vars: Vec<(char, f32)>,

    /// Start with every variable at zero instead of the built-in constants.
    #[arg(long, global = true)]
    no_constants: bool,

    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the tokens of an expression, one per line.
    Tokenize { expression: String },
    /// Print an expression in postfix order.
    Postfix { expression: String },
    /// Evaluate an expression.
    Calc { expression: String },
    /// Read commands interactively (the default).
    Repl,
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut variables = if args.no_constants {
        VariableTable::default()
    } else {
        VariableTable::with_constants()
    };
    for (letter, value) in args.vars {
        variables.set(letter, value)?;
    }

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Tokenize { expression } => {
            for token in Lexer::new(&expression, &variables) {
                let token = token.map_err(with_source(&expression))?;
                println!("{token}");
            }
        }
        Commands::Postfix { expression } => {
            let postfix = shunting_calc::tokenize(&expression, &variables)
                .and_then(|tokens| shunting_calc::to_postfix(tokens))
                .map_err(with_source(&expression))?;
            println!("{postfix}");
        }
        Commands::Calc { expression } => {
            let result = shunting_calc::parse_and_evaluate(&expression, &variables)
                .map_err(with_source(&expression))?;
            println!("{result}");
        }
        Commands::Repl => {
            let stdin = std::io::stdin();
            Session::new(variables)
                .run(stdin.lock(), &mut std::io::stdout(), &mut std::io::stderr())
                .into_diagnostic()
                .wrap_err("reading commands failed")?;
        }
    }
    Ok(())
}

fn with_source(expression: &str) -> impl Fn(CalcError) -> Report + '_ {
    move |e| Report::new(e).with_source_code(expression.to_string())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{
        filter::{LevelFilter, Targets},
        fmt,
        prelude::*,
    };

    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer().with_writer(std::io::stderr).with_filter(
                Targets::new()
                    .with_default(LevelFilter::WARN)
                    .with_target("shunting_calc", level),
            ),
        )
        .init();
}
