pub mod gcode_file;
