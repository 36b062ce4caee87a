use ariadne::FnCache;

use crate::Error;

use std::{
    fmt::Debug,
    io::{self, Write},
};

pub const NATIVE_FILE: &str = "<native>";

const NATIVE_SOURCE: &str = "Error originated from native context";

impl Error {
    /// Renders the report to stderr, resolving `file` to `source`.
    pub fn eprint(&self, source: &str) -> io::Result<()> {
        self.write(source, io::stderr())
    }

    pub fn write<W: Write>(&self, source: &str, w: W) -> io::Result<()> {
        let file = self.span().file.clone();
        let cache = FnCache::new(move |x: &String| -> Result<String, Box<dyn Debug>> {
            if x == NATIVE_FILE {
                Ok(NATIVE_SOURCE.to_owned())
            } else if *x == file {
                Ok(source.to_owned())
            } else {
                std::fs::read_to_string(x).map_err(|x| Box::new(x) as Box<dyn Debug>)
            }
        });
        self.report.write(cache, w)
    }
}
