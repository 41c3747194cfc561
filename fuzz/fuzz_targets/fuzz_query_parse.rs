#![no_main]
use libfuzzer_sys::fuzz_target;
use selectoxide::select;
use selectoxide::tree::Document;

fuzz_target!(|data: &[u8]| {
    if let Ok(query) = std::str::from_utf8(data) {
        // Query parsing should never panic on any input
        match select::evaluator_of(query) {
            Ok(eval) => {
                // And matching with a compiled evaluator should never panic
                let mut doc = Document::new();
                let root = doc.append_element(doc.root(), "root", &[]);
                let child = doc.append_element(root, "child", &[("attr", "val")]);
                doc.append_text(child, "text");
                let _ = select::select_with(&doc, &eval);
            }
            Err(e) => {
                let _ = e.to_string();
            }
        }
    }
});
