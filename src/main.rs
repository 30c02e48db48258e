fn main() {
    if let Err(err) = ibm_shape_style::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
