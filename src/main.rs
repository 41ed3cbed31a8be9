fn main() {
    approved_npo_lib::run()
}
