//! Rewriting a recorded invocation into one that emits LLVM IR.

use irex_compdb::CompileCommand;
use std::path::Path;

/// Flags stripped from the recorded command together with their operand.
/// They encode dependency-tracking and object-output paths from the native
/// build and would conflict with the rewritten output target.
const REMOVED_FLAG_PAIRS: &[&str] = &["-MQ", "-o", "-MF"];

/// Rewrites a recorded compilation into an IR-emitting invocation.
///
/// The recorded compiler binary is replaced with `compiler` (the database
/// may reference a different binary than the one configured for IR
/// generation). Every `-MQ`/`-o`/`-MF` flag is dropped together with the
/// operand that follows it — each occurrence is assumed to be followed by
/// exactly one operand, which holds by construction of recorded command
/// lines. The appended tail selects IR emission at `-O0` without the
/// `optnone` annotation, so downstream passes can still treat the output
/// as optimization-eligible, and tolerates warning-flag skew between the
/// recorded compiler and `compiler`.
///
/// Removal is a single filter pass over flag/operand pairs, so rewriting
/// an already-rewritten command removes nothing beyond the canonical
/// pairs.
pub fn rewrite_for_ir(record: &CompileCommand, compiler: &str, output: &Path) -> Vec<String> {
    let mut args = Vec::with_capacity(record.args.len() + 8);
    args.push(compiler.to_string());

    let mut recorded = record.args.iter().skip(1);
    while let Some(arg) = recorded.next() {
        if REMOVED_FLAG_PAIRS.contains(&arg.as_str()) {
            // The operand travels with its flag.
            recorded.next();
            continue;
        }
        args.push(arg.clone());
    }

    args.extend(
        [
            "-Wno-unknown-warning-option",
            "-emit-llvm",
            "-O0",
            "-Xclang",
            "-disable-O0-optnone",
            "-o",
        ]
        .map(str::to_string),
    );
    args.push(output.display().to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(args: &[&str]) -> CompileCommand {
        CompileCommand {
            file: PathBuf::from("/src/vm/bar.c"),
            directory: PathBuf::from("/build"),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn tail_of(args: &[String]) -> &[String] {
        let n = args.len();
        &args[n - 7..]
    }

    #[test]
    fn strips_output_and_dep_flags() {
        let rec = record(&["cc", "-MQ", "foo.o", "-c", "bar.c", "-o", "foo.o"]);
        let out = rewrite_for_ir(&rec, "/usr/bin/clang", Path::new("/out/bar.bc"));

        assert!(!out.contains(&"-MQ".to_string()));
        assert!(!out.contains(&"foo.o".to_string()));
        // Exactly one -o remains, and it is the appended one.
        let o_positions: Vec<_> = out.iter().enumerate().filter(|(_, a)| *a == "-o").collect();
        assert_eq!(o_positions.len(), 1);
        assert_eq!(o_positions[0].0, out.len() - 2);
        assert_eq!(out.last().unwrap(), "/out/bar.bc");
    }

    #[test]
    fn substitutes_compiler_binary() {
        let rec = record(&["gcc-12", "-c", "bar.c"]);
        let out = rewrite_for_ir(&rec, "/usr/bin/clang", Path::new("/out/bar.bc"));
        assert_eq!(out[0], "/usr/bin/clang");
        assert!(!out.contains(&"gcc-12".to_string()));
    }

    #[test]
    fn preserves_remaining_flags_in_order() {
        let rec = record(&["cc", "-DNDEBUG", "-I", "include", "-c", "bar.c", "-o", "bar.o"]);
        let out = rewrite_for_ir(&rec, "clang", Path::new("bar.bc"));
        assert_eq!(&out[1..6], &["-DNDEBUG", "-I", "include", "-c", "bar.c"]);
    }

    #[test]
    fn appends_ir_tail() {
        let rec = record(&["cc", "-c", "bar.c"]);
        let out = rewrite_for_ir(&rec, "clang", Path::new("bar.bc"));
        assert_eq!(
            tail_of(&out),
            &[
                "-Wno-unknown-warning-option",
                "-emit-llvm",
                "-O0",
                "-Xclang",
                "-disable-O0-optnone",
                "-o",
                "bar.bc"
            ]
        );
    }

    #[test]
    fn removes_multiple_pairs() {
        let rec = record(&[
            "cc", "-MF", "dep.d", "-MQ", "foo.o", "-c", "bar.c", "-o", "a.o", "-o", "b.o",
        ]);
        let out = rewrite_for_ir(&rec, "clang", Path::new("bar.bc"));
        for gone in ["-MF", "dep.d", "-MQ", "foo.o", "a.o", "b.o"] {
            assert!(!out.contains(&gone.to_string()), "{gone} should be removed");
        }
    }

    #[test]
    fn idempotent_on_rewritten_command() {
        let rec = record(&["cc", "-MQ", "foo.o", "-c", "bar.c", "-o", "foo.o"]);
        let once = rewrite_for_ir(&rec, "clang", Path::new("bar.bc"));

        let rewritten = CompileCommand {
            file: PathBuf::from("/src/vm/bar.c"),
            directory: PathBuf::from("/build"),
            args: once.clone(),
        };
        let twice = rewrite_for_ir(&rewritten, "clang", Path::new("bar.bc"));

        // Only the canonical pairs are removed on a second pass: the
        // trailing "-o bar.bc" is dropped and re-appended with the tail,
        // everything else survives intact.
        let mut expected = once.clone();
        expected.truncate(expected.len() - 2);
        expected.extend(tail_of(&once).iter().cloned());
        assert_eq!(twice, expected);
    }

    #[test]
    fn trivial_fallback_rewrites_cleanly() {
        let rec = CompileCommand::fallback("clang", Path::new("/src/vm/bar.c"));
        let out = rewrite_for_ir(&rec, "clang", Path::new("/out/bar.bc"));
        assert_eq!(out[0], "clang");
        assert_eq!(out[1], "/src/vm/bar.c");
        assert_eq!(out.last().unwrap(), "/out/bar.bc");
    }
}
