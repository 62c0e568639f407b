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

//! A small, hand-built [`InMemoryDictionary`] covering just enough
//! vocabulary to drive the sentences this demo prints. It is not meant
//! to be linguistically complete — every word-to-word relationship is
//! a single connector pair, which is enough to show the pipeline
//! tokenizing, pruning, counting and post-processing a sentence without
//! pulling in a real `.dict` file (out of scope per the core crates).

use linkgrammar::{AffixClass, Direction, InMemoryDictionary, SurfaceExp, UNKNOWN_WORD};

fn conn(cost: f32, name: &str, dir: Direction) -> SurfaceExp {
    SurfaceExp::connector(cost, name, dir, false, u16::MAX)
}

fn and2(a: SurfaceExp, b: SurfaceExp) -> SurfaceExp {
    SurfaceExp::and(0.0, vec![a, b])
}

pub fn build() -> InMemoryDictionary {
    let mut d = InMemoryDictionary::new();

    // "this is a test"
    d.insert("this", conn(0.0, "S", Direction::Right), Some("pronoun".into()));
    d.insert("is", and2(conn(0.0, "S", Direction::Left), conn(0.0, "O", Direction::Right)), Some("verb".into()));
    d.insert("test", conn(0.0, "D", Direction::Left), Some("noun".into()));

    // "The cat sat on the mat." — "the"/"a" are determiners with two
    // roles: plain "det + noun" (Right D), and the tail of a
    // prepositional phrase that still introduces a noun (Left J, Right D).
    d.insert("a", and2(conn(0.0, "O", Direction::Left), conn(0.0, "D", Direction::Right)), Some("det".into()));
    d.insert("the", conn(0.0, "D", Direction::Right), Some("det".into()));
    d.insert("the", and2(conn(0.0, "J", Direction::Left), conn(0.0, "D", Direction::Right)), Some("det-of-pp".into()));
    d.insert("cat", and2(conn(0.0, "D", Direction::Left), conn(0.0, "S", Direction::Right)), Some("noun".into()));
    d.insert("sat", and2(conn(0.0, "S", Direction::Left), conn(0.0, "Mv", Direction::Right)), Some("verb".into()));
    d.insert("on", and2(conn(0.0, "Mv", Direction::Left), conn(0.0, "J", Direction::Right)), Some("prep".into()));
    d.insert("mat", conn(0.0, "D", Direction::Left), Some("noun".into()));

    // "I can't go." — tokenizer splits "can't" into "can" + "n't" via
    // the Suf affix class; "can.=" only needs to exist so that split
    // is considered, the real expression lives on the bare "can" entry.
    d.insert("i", conn(0.0, "Sp", Direction::Right), Some("pronoun".into()));
    d.insert("can", and2(conn(0.0, "Sp", Direction::Left), conn(0.0, "Xc", Direction::Right)), Some("modal".into()));
    d.insert("can.=", SurfaceExp::null(0.0), Some("modal-stem-marker".into()));
    d.insert("n't", and2(conn(0.0, "Xc", Direction::Left), conn(0.0, "Ivb", Direction::Right)), Some("negation".into()));
    d.insert("go", conn(0.0, "Ivb", Direction::Left), Some("verb".into()));

    // "12ft of rope" — tokenizer splits "12ft" on the Units affix class
    // into the numeric stem "12" and the unit suffix "ft".
    d.insert("12", conn(0.0, "Num", Direction::Right), Some("number".into()));
    d.insert("ft", and2(conn(0.0, "Num", Direction::Left), conn(0.0, "P", Direction::Right)), Some("unit".into()));
    d.insert("of", and2(conn(0.0, "P", Direction::Left), conn(0.0, "J", Direction::Right)), Some("prep".into()));
    d.insert("rope", conn(0.0, "J", Direction::Left), Some("noun".into()));

    // "xyzzy plugh" — neither word is in the dictionary; with
    // use_unknown_word on, both fall back to UNKNOWN-WORD, which can
    // link to an adjacent UNKNOWN-WORD on either side.
    d.insert(
        UNKNOWN_WORD,
        SurfaceExp::or(0.0, vec![conn(0.0, "Unk", Direction::Right), conn(0.0, "Unk", Direction::Left)]),
        Some("catch-all".into())
    );

    d.set_affix_class(AffixClass::RPunc, vec![".".into(), ",".into()]);
    d.set_affix_class(AffixClass::Suf, vec!["n't".into()]);
    d.set_affix_class(AffixClass::Units, vec!["ft".into()]);

    d
}
