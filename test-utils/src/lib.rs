use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
    str,
};

const WHY_PATH: &str = "./target/debug/why";

/// A `.why` source file materialized under a throwaway directory so tests
/// can pass real paths to the interpreter binary without touching the repo.
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    pub fn write(dir: &Path, name: &str, contents: &str) -> Result<Self, Box<dyn Error>> {
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        fs::write(&path, contents)?;
        Ok(SourceFile { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
    pub exit_code: i32,
}

impl<'a> Expected<'a> {
    fn assert_matches(&self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        assert_eq!(output.status.code(), Some(self.exit_code));
        Ok(())
    }
}

/// Runs the interpreter over `files`, feeding it `stdin`, with the given
/// trailing `--args`, and checks stdout/stderr/exit code all at once.
pub fn run_and_check(files: &[&Path], program_args: &[&str], stdin: &str, expected: Expected) -> Result<(), Box<dyn Error>> {
    use std::io::Write;

    let mut command = Command::new(WHY_PATH);
    for file in files {
        command.arg(file);
    }
    if !program_args.is_empty() {
        command.arg("--args").args(program_args);
    }
    command.stdin(std::process::Stdio::piped());
    command.stdout(std::process::Stdio::piped());
    command.stderr(std::process::Stdio::piped());

    let mut child = command.spawn()?;
    child.stdin.take().expect("piped stdin").write_all(stdin.as_bytes())?;
    let output = child.wait_with_output()?;

    expected.assert_matches(&output)
}

pub fn run_dump(files: &[&Path]) -> Result<Output, Box<dyn Error>> {
    let mut command = Command::new(WHY_PATH);
    command.arg("--dump-dt");
    for file in files {
        command.arg(file);
    }
    Ok(command.output()?)
}
