// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The fixed Python runtime prelude.
//!
//! Every emitted program starts with this text. It emulates the
//! pseudocode constructs the target does not share: one-based bounded
//! arrays, inclusive FOR ranges, typed `INPUT`, line-based `OUTPUT`, and
//! mode-disciplined virtual files. The sandbox seeds `__stdin_lines` and
//! `__virtual_files` before running and collects `__stdout_parts` and
//! `__virtual_files` afterwards; standalone runs fall back to real
//! standard input and output.

/// The runtime prelude emitted ahead of every generated program.
pub const RUNTIME_PRELUDE: &str = r#"# Runtime support for compiled pseudocode. Do not edit.
import random as __random_module

__stdin_lines = []
__stdout_parts = []
__virtual_files = {}
__open_files = {}


class __PseudoArray:
    """A bounded array with inclusive, possibly negative bounds."""

    def __init__(self, bounds, default):
        self.bounds = [(int(lo), int(hi)) for (lo, hi) in bounds]
        for lo, hi in self.bounds:
            if hi < lo:
                raise RuntimeError("Array upper bound %d is below lower bound %d" % (hi, lo))
        self.default = default
        self.items = {}

    def __normalize(self, key):
        if not isinstance(key, tuple):
            key = (key,)
        if len(key) != len(self.bounds):
            raise RuntimeError(
                "Array expects %d index(es), got %d" % (len(self.bounds), len(key))
            )
        normalized = []
        for index, (lo, hi) in zip(key, self.bounds):
            index = int(index)
            if index < lo or index > hi:
                raise RuntimeError("Array index %d outside bounds %d:%d" % (index, lo, hi))
            normalized.append(index)
        return tuple(normalized)

    def __getitem__(self, key):
        return self.items.get(self.__normalize(key), self.default)

    def __setitem__(self, key, value):
        self.items[self.__normalize(key)] = value


def __inclusive_range(start, end, step):
    start, end, step = int(start), int(end), int(step)
    if step == 0:
        raise RuntimeError("FOR loop STEP must not be 0")
    if step > 0:
        return range(start, end + 1, step)
    return range(start, end - 1, step)


def __input():
    if __stdin_lines:
        return __stdin_lines.pop(0)
    try:
        return input()
    except EOFError:
        raise RuntimeError("INPUT: no input available") from None


def __coerce_input(value, type_name):
    value = str(value)
    if type_name == "INTEGER":
        try:
            return int(value.strip())
        except ValueError:
            raise RuntimeError("INPUT: %r is not an INTEGER" % value) from None
    if type_name == "REAL":
        try:
            return float(value.strip())
        except ValueError:
            raise RuntimeError("INPUT: %r is not a REAL" % value) from None
    if type_name == "BOOLEAN":
        return value.strip().upper() == "TRUE"
    if type_name == "CHAR":
        return value[:1]
    return value


def __output(*values):
    line = "".join(str(v) for v in values)
    __stdout_parts.append(line)
    print(line)


def __div(a, b):
    return int(a) // int(b)


def __mod(a, b):
    return int(a) % int(b)


def __length(s):
    return len(str(s))


def __lcase(s):
    return str(s).lower()


def __ucase(s):
    return str(s).upper()


def __substring(s, start, length):
    s = str(s)
    start = max(1, int(start))
    length = max(0, int(length))
    return s[start - 1 : start - 1 + length]


def __round_to(value, places):
    return round(float(value), int(places))


def __random_value():
    return __random_module.random()


def __openfile(name, mode):
    key = str(name)
    if key in __open_files:
        raise RuntimeError('File "%s" is already open' % key)
    if mode == "READ":
        if key not in __virtual_files:
            raise RuntimeError('File "%s" does not exist' % key)
    else:
        __virtual_files[key] = []
    __open_files[key] = {"mode": mode, "cursor": 0}


def __readfile(name):
    key = str(name)
    handle = __open_files.get(key)
    if handle is None:
        raise RuntimeError('File "%s" is not open' % key)
    if handle["mode"] != "READ":
        raise RuntimeError('File "%s" is not open for READ' % key)
    lines = __virtual_files[key]
    if handle["cursor"] >= len(lines):
        raise RuntimeError('File "%s" has no more lines' % key)
    line = lines[handle["cursor"]]
    handle["cursor"] += 1
    return line


def __writefile(name, value):
    key = str(name)
    handle = __open_files.get(key)
    if handle is None:
        raise RuntimeError('File "%s" is not open' % key)
    if handle["mode"] != "WRITE":
        raise RuntimeError('File "%s" is not open for WRITE' % key)
    __virtual_files[key].append(str(value))


def __closefile(name):
    key = str(name)
    if key not in __open_files:
        raise RuntimeError('File "%s" is not open' % key)
    del __open_files[key]
"#;
