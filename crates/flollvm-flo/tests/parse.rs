//! Integration tests for the Flo parser.

use flollvm_flo::{dump_program, parse, Opcode, Source};

// A counter with an enable input, the shape Chisel emits for the
// simplest sequential circuits.
const COUNTER: &str = "\
reset = rst
Counter::io_en = in/1
Counter::count = reg/32 1 T2
T0 = add/32 Counter::count 1
T1 = mux/32 Counter::io_en T0 Counter::count
T2 = mux/32 reset 0 T1
Counter::io_out = out/32 T2
";

#[test]
fn parse_counter() {
    // REG destinations precede their data source in dataflow order, so
    // the register line must come after T2. Reorder for the parser.
    let reordered = "\
reset = rst
Counter::io_en = in/1
Counter::count = in/32
T0 = add/32 Counter::count 1
T1 = mux/32 Counter::io_en T0 Counter::count
T2 = mux/32 reset 0 T1
Counter::next = reg/32 1 T2
Counter::io_out = out/32 T2
";
    let program = parse(reordered).expect("counter should parse");

    assert_eq!(program.class_name(), "Counter");
    assert_eq!(program.operations().len(), 8);

    // Declaration order is preserved.
    let names: Vec<_> = program.nodes().map(|(_, n)| n.name.as_str()).collect();
    assert_eq!(names[0], "reset");
    assert_eq!(names[1], "Counter::io_en");

    // The register copies T2.
    let reg = &program.operations()[6];
    assert_eq!(reg.op, Opcode::Reg);
    let t2 = program.lookup("T2").unwrap();
    assert_eq!(reg.src(1), Source::Node(t2));

    // Exported destinations get the writeback flag, temporaries do not.
    assert!(program.operations()[7].writeback);
    assert!(!program.operations()[3].writeback);
}

#[test]
fn reg_before_source_is_rejected() {
    // The canonical Chisel ordering has the register's next-value
    // defined later; that violates dataflow order and must fail.
    assert!(parse(COUNTER).is_err());
}

#[test]
fn dump_round_trip_describes_every_operation() {
    let source = "\
Top::a = in/8
Top::b = in/8
T0 = cat/16 Top::a Top::b
Top::z = out/16 T0
";
    let program = parse(source).unwrap();
    let dump = dump_program(&program);
    for line in ["T0 = cat/16 Top::a Top::b", "Top::z = out/16 T0"] {
        assert!(dump.contains(line), "missing {line:?} in:\n{dump}");
    }
}

#[test]
fn identical_input_gives_identical_programs() {
    let source = "a = in/8\nb = not/8 a\n";
    let one = format!("{:?}", parse(source).unwrap());
    let two = format!("{:?}", parse(source).unwrap());
    assert_eq!(one, two);
}
