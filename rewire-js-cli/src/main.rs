use clap::Parser;
use rewire_js::emit::emit_module;
use rewire_js::emit::EmitOptions;
use rewire_js::err::RewireError;
use rewire_js::parse::parse;
use rewire_js::rewrite::rewrite_module;
use rewire_js::RewireOptions;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[command(
  name = "rewire-js",
  version,
  about = "Rewrites a JS module so every top-level binding can be replaced through `exports`"
)]
struct Cli {
  /// File to rewrite; omit for stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Write output without optional whitespace.
  #[arg(long)]
  minify: bool,

  /// Write the rewritten syntax tree as JSON instead of JavaScript.
  #[arg(long)]
  dump_ast: bool,

  /// Top-level call that marks a test module, which is left untouched. Repeatable; defaults to
  /// `describe`.
  #[arg(long = "test-primitive", value_name = "NAME")]
  test_primitives: Vec<String>,

  /// Don't append the `__esModule` marker.
  #[arg(long)]
  no_module_marker: bool,

  /// Emit tracing spans (JSON) to stderr.
  #[arg(long)]
  trace: bool,
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::DEBUG)
    .json()
    .with_ansi(false)
    .try_init();
}

fn exit_with_error(message: impl AsRef<str>) -> ! {
  eprintln!("error: {}", message.as_ref());
  process::exit(1);
}

fn run(args: &Cli, source: &str) -> Result<Vec<u8>, RewireError> {
  let mut options = RewireOptions::new().with_module_marker(!args.no_module_marker);
  if !args.test_primitives.is_empty() {
    options = options.with_test_primitives(args.test_primitives.iter().cloned());
  }
  if args.minify {
    options = options.with_emit(EmitOptions::minified());
  }
  let mut module = parse(source).map_err(RewireError::Syntax)?;
  rewrite_module(&mut module, &options)?;
  if args.dump_ast {
    let mut out = match serde_json::to_vec(&module) {
      Ok(out) => out,
      Err(err) => exit_with_error(format!("failed to serialize syntax tree: {}", err)),
    };
    out.push(b'\n');
    return Ok(out);
  }
  emit_module(&module, options.emit)
    .map(String::into_bytes)
    .map_err(RewireError::Emit)
}

fn main() {
  let args = Cli::parse();
  init_tracing(args.trace);
  let input_name = args
    .input
    .as_ref()
    .map(|p| p.to_string_lossy().into_owned())
    .unwrap_or_else(|| "<stdin>".to_string());
  let mut input = Vec::new();
  let mut input_file: Box<dyn Read> = match args.input.as_ref() {
    Some(p) => match File::open(p) {
      Ok(f) => Box::new(f),
      Err(err) => exit_with_error(format!("failed to open {}: {}", p.display(), err)),
    },
    None => Box::new(stdin()),
  };
  if let Err(err) = input_file.read_to_end(&mut input) {
    exit_with_error(format!("failed to read {}: {}", input_name, err));
  }
  let source = match std::str::from_utf8(&input) {
    Ok(source) => source,
    Err(err) => exit_with_error(RewireError::InvalidUtf8(err).to_string()),
  };
  let output = match run(&args, source) {
    Ok(output) => output,
    Err(RewireError::Syntax(err)) => {
      eprintln!("{}", err.render(&input_name, source));
      process::exit(1);
    }
    Err(err) => exit_with_error(err.to_string()),
  };
  let write_result = match args.output.as_ref() {
    Some(p) => File::create(p)
      .and_then(|mut file| file.write_all(&output))
      .map_err(|err| (p.display().to_string(), err)),
    None => stdout()
      .write_all(&output)
      .map_err(|err| ("<stdout>".to_string(), err)),
  };
  if let Err((dest, err)) = write_result {
    exit_with_error(format!("failed to write {}: {}", dest, err));
  }
}
