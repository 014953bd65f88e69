pub trait Printer {
    fn println(&self, output: &str);
    fn eprintln(&self, output: &str);
}

/// Prints to the process standard output and error streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl Printer for Console {
    fn println(&self, output: &str) {
        println!("{}", output);
    }

    fn eprintln(&self, output: &str) {
        eprintln!("{}", output);
    }
}
