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

use indexmap::IndexSet;

/// An interned string. Two `Sym`s minted from the same [`StringPool`]
/// compare equal if and only if the strings they name are byte-equal
/// (spec.md §8 property 1).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Sym(u32);

impl Sym {
    /// Raw index into the owning pool's arena. Only meaningful paired
    /// with that pool.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena that deduplicates connector and word strings for one sentence.
///
/// `IndexSet` gives us the hash-lookup and the insertion-ordered arena
/// in one structure (the same role `cfgrammar`'s symbol table uses it
/// for), rather than a `Vec` paired with a separate `HashMap`. There is
/// no way to remove an individual string; the whole pool is freed when
/// the sentence that owns it is dropped. This mirrors the original
/// `String_set` (`string-set.h`): append-only, sentence-scoped.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: IndexSet<Box<str>>
}

impl StringPool {
    pub fn new() -> Self {
        StringPool { strings: IndexSet::new() }
    }

    /// Intern `s`, returning its existing `Sym` if already present.
    pub fn intern(&mut self, s: &str) -> Sym {
        let (idx, _) = self.strings.insert_full(s.into());
        Sym(idx as u32)
    }

    /// Resolve a `Sym` minted by this pool back to its string.
    pub fn resolve(&self, sym: Sym) -> &str {
        &self.strings[sym.index()]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::StringPool;

    #[test]
    fn idempotent_interning() {
        let mut pool = StringPool::new();
        let a1 = pool.intern("Sp");
        let b = pool.intern("Ss");
        let a2 = pool.intern("Sp");
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(pool.resolve(a1), "Sp");
        assert_eq!(pool.resolve(b), "Ss");
    }

    #[test]
    fn distinct_strings_distinct_syms() {
        let mut pool = StringPool::new();
        let syms: Vec<_> = ["A", "B", "A", "C", "B"].iter().map(|s| pool.intern(s)).collect();
        assert_eq!(syms[0], syms[2]);
        assert_eq!(syms[1], syms[4]);
        assert_ne!(syms[0], syms[1]);
        assert_ne!(syms[0], syms[3]);
        assert_eq!(pool.len(), 3);
    }
}
