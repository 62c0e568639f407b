// Copyright (c) 2017 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::io::{self, BufRead, Write};
use std::process::exit;

use linkgrammar::{DriverError, Linkage, ParseOptions, Sentence};

mod dictionary;

fn print_usage(program: &str, opts: &getopts::Options) {
    let brief = format!("Usage: {program} [options] [SENTENCE...]");
    print!("{}", opts.usage(&brief));
}

fn print_linkage(i: usize, linkage: &Linkage) {
    println!("  linkage {i}: {:?}", linkage.cost_vector());
    let words: Vec<&str> = (0..linkage.num_words()).map(|w| linkage.word(w)).collect();
    println!("    words: {}", words.join(" "));
    for li in 0..linkage.num_links() {
        let link = linkage.link(li);
        println!("    {} -{}- {} ({})", linkage.word(link.lw), link.composite_name, linkage.word(link.rw), link.length());
    }
    if let Some(v) = linkage.violation_name() {
        println!("    post-process violation: {v}");
    } else {
        println!("    post-process: no violation");
    }
}

fn parse_and_print(dict: &dyn linkgrammar::Dictionary, text: &str, opts: &ParseOptions) {
    match Sentence::parse(dict, text, opts) {
        Ok(sentence) => {
            println!("{} words, {} linkage(s)", sentence.num_words(), sentence.linkages.len());
            if sentence.resource_exhausted {
                println!("  (resource budget exhausted; counts may be incomplete)");
            }
            if sentence.count_overflowed {
                println!("  (linkage count overflowed and was clamped)");
            }
            for w in &sentence.tokenize_warnings {
                println!("  tokenize warning: {w:?}");
            }
            for (i, linkage) in sentence.linkages.iter().enumerate() {
                print_linkage(i, linkage);
            }
        }
        Err(DriverError::InputInvalid(e)) => println!("input invalid: {e}"),
        Err(DriverError::DictionaryInconsistent(e)) => println!("dictionary inconsistent: {e}")
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program = args[0].clone();

    let mut opts = getopts::Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("u", "unknown-word", "fall back to UNKNOWN-WORD for out-of-dictionary tokens");
    opts.optopt("n", "max-null", "maximum null-linked word count (default 2)", "N");
    opts.optopt("l", "limit", "maximum linkages to extract (default 100)", "N");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{f}");
            print_usage(&program, &opts);
            exit(1);
        }
    };

    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return;
    }

    let max_null: u32 = matches.opt_get("n").ok().flatten().unwrap_or(2);
    let limit: usize = matches.opt_get("l").ok().flatten().unwrap_or(100);

    let mut dict = dictionary::build();
    dict.set_use_unknown_word(matches.opt_present("u"));
    if let Err(e) = dict.validate() {
        eprintln!("built-in dictionary is inconsistent: {e}");
        exit(1);
    }

    let parse_opts = ParseOptions { max_null_count: max_null, linkage_limit: limit, ..ParseOptions::default() };

    if !matches.free.is_empty() {
        for sentence in &matches.free {
            println!(">>> {sentence}");
            parse_and_print(&dict, sentence, &parse_opts);
        }
        return;
    }

    let stdin = io::stdin();
    loop {
        print!(">>> ");
        io::stdout().flush().ok();
        match stdin.lock().lines().next() {
            Some(Ok(ref line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                parse_and_print(&dict, line, &parse_opts);
            }
            _ => break
        }
    }
}
