// Operation listing

use veritas_contracts::Operation;

pub fn list() {
    for op in Operation::ALL {
        let kind = if op.is_mutating() { "write" } else { "read" };
        println!("{:<32} {:<5} {}", op.name(), kind, op.parameters().join(" "));
    }
}
