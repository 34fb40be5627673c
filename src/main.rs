fn main() {
    emojify_lib::run()
}
