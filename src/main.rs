use why_interp::cli::Args;
use why_interp::error::{WhyError, WhyResult};
use why_interp::interpreter::Interpreter;

fn main() {
    simple_logger::init_with_level(log::Level::Warn).unwrap();
    std::panic::set_hook(Box::new(|_| {}));

    let exit_code = match std::panic::catch_unwind(run) {
        Ok(Ok(code)) => code,
        Ok(Err(err)) => {
            eprint!("{err}");
            1
        }
        Err(payload) => {
            eprint!("{}", WhyError::Unexpected(panic_message(&payload)));
            1
        }
    };

    std::process::exit(exit_code);
}

fn run() -> WhyResult<i32> {
    let args = Args::parse(std::env::args().skip(1)).map_err(WhyError::from)?;

    if args.dump_dt {
        let program = why_interp::build_merged_program(&args.files)?;
        print!("{}", why_interp::dump::dump_program(&program));
        return Ok(0);
    }

    let program = why_interp::build_program(&args.files)?;
    let mut interpreter = Interpreter::new(&program, args.program_args);
    interpreter.run()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_owned()
    }
}
