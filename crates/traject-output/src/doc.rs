//! Documentation pass: the audited slot listing (`doc.asc`).

use std::io::{self, Write};
use traject_core::{OutputTags, Role, SlotIdx, SlotKind, VarStore};

const NAME_W: usize = 15;
const KIND_W: usize = 5;
const DEF_W: usize = 54;
const MOD_W: usize = 13;
const ROLE_W: usize = 10;

/// Writes the annotated listing of every defined slot: index, name, kind,
/// definition, owning module, role, output tags.
///
/// Duplicate names are flagged with error code `A` in column one — the
/// audit is how users diagnose a mis-assembled module set, so it is
/// written even when the run aborts.
pub struct DocWriter;

impl DocWriter {
    /// Write the listing for `store` under `title`.
    pub fn write<W: Write>(sink: &mut W, store: &VarStore, title: &str) -> io::Result<()> {
        let dups = store.duplicate_names();
        writeln!(sink, "*** {title} ***")?;
        writeln!(sink)?;
        writeln!(sink, "                         Module-Variable Array")?;
        writeln!(sink)?;
        let rule = "-".repeat(1 + 4 + NAME_W + KIND_W + DEF_W + MOD_W + ROLE_W + 14);
        writeln!(sink, "{rule}")?;
        writeln!(
            sink,
            "|LOC|      NAME         |                    DEFINITION                       |   MODULE   |   ROLE  |    OUTPUT    |"
        )?;
        writeln!(sink, "{rule}")?;

        let mut emitted = 0usize;
        for (idx, def, _) in store.iter_defined() {
            let flag = if dups.iter().any(|&(a, b)| a == idx || b == idx) {
                'A'
            } else {
                ' '
            };
            let kind = match def.kind {
                SlotKind::Int => " int ",
                SlotKind::Vec3 => " vec ",
                SlotKind::Mat3 => " mat ",
                _ => "     ",
            };
            let name: String = def.name.chars().take(NAME_W).collect();
            let definition: String = def.definition.chars().take(DEF_W).collect();
            let module: String = def.module.chars().take(MOD_W).collect();
            writeln!(
                sink,
                "{flag}{:<4}{name:<NAME_W$}{kind}{definition:<DEF_W$}{module:<MOD_W$}{:<ROLE_W$}{}",
                idx.0,
                def.role.to_string(),
                def.output,
            )?;
            emitted += 1;
            if emitted % 10 == 0 {
                writeln!(sink, "{rule}")?;
            }
        }
        writeln!(sink, "{rule}")?;
        Ok(())
    }
}

/// One parsed row of a doc listing.
#[derive(Clone, Debug, PartialEq)]
pub struct DocEntry {
    /// Slot index.
    pub index: SlotIdx,
    /// Slot name.
    pub name: String,
    /// Slot kind.
    pub kind: SlotKind,
    /// Definition text (possibly truncated by the fixed column).
    pub definition: String,
    /// Owning module.
    pub module: String,
    /// Role.
    pub role: Role,
    /// Output routing.
    pub output: OutputTags,
}

/// Re-parse a doc listing back into its slot table.
///
/// The listing is the canonical audit of a loaded scenario; parsing it
/// back and comparing against the live store is the round-trip check the
/// test suite (and external tooling) uses.
pub fn parse_listing(text: &str) -> Vec<DocEntry> {
    let mut entries = Vec::new();
    for line in text.lines() {
        // Data rows start with the flag column then a digit of the index.
        let bytes: Vec<char> = line.chars().collect();
        if bytes.len() < 1 + 4 + NAME_W + KIND_W + DEF_W + MOD_W + ROLE_W {
            continue;
        }
        if !bytes[1].is_ascii_digit() {
            continue;
        }
        let slice = |from: usize, width: usize| -> String {
            bytes[from..from + width].iter().collect::<String>().trim().to_string()
        };
        let index: u32 = match slice(1, 4).parse() {
            Ok(i) => i,
            Err(_) => continue,
        };
        let mut at = 5;
        let name = slice(at, NAME_W);
        at += NAME_W;
        let kind = match slice(at, KIND_W).as_str() {
            "int" => SlotKind::Int,
            "vec" => SlotKind::Vec3,
            "mat" => SlotKind::Mat3,
            _ => SlotKind::Real,
        };
        at += KIND_W;
        let definition = slice(at, DEF_W);
        at += DEF_W;
        let module = slice(at, MOD_W);
        at += MOD_W;
        let role = match slice(at, ROLE_W).as_str() {
            "data" => Role::Data,
            "init" => Role::Init,
            "state" => Role::State,
            "save" => Role::Save,
            "diag" => Role::Diag,
            "exec" => Role::Exec,
            _ => Role::Out,
        };
        at += ROLE_W;
        let tags: String = bytes[at..].iter().collect();
        let mut output = OutputTags::none();
        if tags.contains("scrn") {
            output = output.and(OutputTags::screen());
        }
        if tags.contains("plot") {
            output = output.and(OutputTags::plot());
        }
        if tags.contains("com") {
            output = output.and(OutputTags::com());
        }
        entries.push(DocEntry {
            index: SlotIdx(index),
            name,
            kind,
            definition,
            module,
            role,
            output,
        });
    }
    entries
}
