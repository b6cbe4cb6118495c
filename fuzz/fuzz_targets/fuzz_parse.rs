#![no_main]

use evosym::Expr;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Anything that parses must render back to a string that parses the same
    if let Ok(expr) = text.parse::<Expr>() {
        assert!(expr.is_well_formed());
        let rendered = expr.to_string();
        let reparsed: Expr = rendered.parse().expect("rendered expression must parse");
        assert_eq!(reparsed, expr);
    }
});
